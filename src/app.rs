use std::sync::Arc;

use adw::prelude::*;
use relm4::prelude::*;

use crate::api::{ApiOutcome, ApiRequest, ChatApi};
use crate::config::{self, ClientConfig};
use crate::controllers::{ChatController, ConversationListController, SortKey};
use crate::models::ConversationId;
use crate::services::collation::TitleCollator;
use crate::ui::chat_view::{ChatView, ChatViewOutput};
use crate::ui::history_view::{HistoryView, HistoryViewOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Chat,
    History,
}

impl Page {
    fn name(&self) -> &'static str {
        match self {
            Page::Chat => "chat",
            Page::History => "history",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "chat" => Some(Page::Chat),
            "history" => Some(Page::History),
            _ => None,
        }
    }
}

pub struct AppInit {
    pub config: ClientConfig,
    pub api: Arc<dyn ChatApi>,
}

pub struct App {
    api: Arc<dyn ChatApi>,
    chat: ChatController,
    history: ConversationListController,
    chat_view: Controller<ChatView>,
    history_view: Controller<HistoryView>,
    view_stack: adw::ViewStack,
}

#[derive(Debug)]
pub enum AppMsg {
    PageShown(Page),
    // Chat page
    NewChat,
    OpenConversation(ConversationId),
    SendRequested(String),
    InputChanged(usize),
    ClearRequested,
    ClearConfirmed,
    // History page
    RefreshHistory,
    SearchChanged(String),
    SortChanged(SortKey),
    ViewConversation(ConversationId),
    OpenInChat(ConversationId),
    ShowDeleteModal(ConversationId),
    HideDeleteModal,
    ConfirmDelete,
}

/// Finished API calls, tagged with the page that asked for them.
#[derive(Debug)]
pub enum AppCmd {
    Chat(ApiOutcome),
    History(ApiOutcome),
    Health(ApiOutcome),
}

#[relm4::component(pub)]
impl Component for App {
    type Init = AppInit;
    type Input = AppMsg;
    type Output = ();
    type CommandOutput = AppCmd;

    view! {
        adw::ApplicationWindow {
            set_title: Some(config::APP_NAME),
            set_default_width: 1100,
            set_default_height: 760,
            set_width_request: 620,
            set_height_request: 480,

            #[local_ref]
            toolbar_view -> adw::ToolbarView {},
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let chat_view = ChatView::builder()
            .launch(())
            .forward(sender.input_sender(), |output| match output {
                ChatViewOutput::NewChat => AppMsg::NewChat,
                ChatViewOutput::OpenConversation(id) => AppMsg::OpenConversation(id),
                ChatViewOutput::Send(text) => AppMsg::SendRequested(text),
                ChatViewOutput::InputChanged(len) => AppMsg::InputChanged(len),
                ChatViewOutput::ClearRequested => AppMsg::ClearRequested,
                ChatViewOutput::ClearConfirmed => AppMsg::ClearConfirmed,
            });

        let locale = gtk::default_language().to_str();
        tracing::debug!("Sorting titles for locale {}", locale);
        let history = ConversationListController::new()
            .with_collator(TitleCollator::new(&locale))
            .with_sort(init.config.initial_sort);

        let history_view = HistoryView::builder()
            .launch(history.sort_by())
            .forward(sender.input_sender(), |output| match output {
                HistoryViewOutput::Refresh => AppMsg::RefreshHistory,
                HistoryViewOutput::SearchChanged(term) => AppMsg::SearchChanged(term),
                HistoryViewOutput::SortChanged(key) => AppMsg::SortChanged(key),
                HistoryViewOutput::View(id) => AppMsg::ViewConversation(id),
                HistoryViewOutput::OpenInChat(id) => AppMsg::OpenInChat(id),
                HistoryViewOutput::ShowDeleteModal(id) => AppMsg::ShowDeleteModal(id),
                HistoryViewOutput::HideDeleteModal => AppMsg::HideDeleteModal,
                HistoryViewOutput::ConfirmDelete => AppMsg::ConfirmDelete,
            });

        let view_stack = adw::ViewStack::new();
        view_stack.add_titled_with_icon(
            chat_view.widget(),
            Some(Page::Chat.name()),
            "Chat",
            "mail-unread-symbolic",
        );
        view_stack.add_titled_with_icon(
            history_view.widget(),
            Some(Page::History.name()),
            "History",
            "document-open-recent-symbolic",
        );

        let sender_page = sender.input_sender().clone();
        view_stack.connect_visible_child_name_notify(move |stack| {
            if let Some(page) = stack.visible_child_name().as_deref().and_then(Page::from_name) {
                sender_page.emit(AppMsg::PageShown(page));
            }
        });

        let switcher = adw::ViewSwitcher::builder()
            .stack(&view_stack)
            .policy(adw::ViewSwitcherPolicy::Wide)
            .build();
        let header = adw::HeaderBar::builder().title_widget(&switcher).build();

        let toolbar_view = adw::ToolbarView::new();
        toolbar_view.add_top_bar(&header);
        toolbar_view.set_content(Some(&view_stack));

        let mut model = App {
            api: init.api,
            chat: ChatController::new(),
            history,
            chat_view,
            history_view,
            view_stack,
        };

        let widgets = view_output!();

        tracing::info!("Connecting to {}", init.config.server_url);
        model.run(&sender, vec![ApiRequest::Health], AppCmd::Health);

        let mut requests = model.chat.initialize(&mut model.chat_view);
        if let Some(id) = init.config.initial_conversation {
            requests.extend(model.chat.load_conversation(id, &mut model.chat_view));
        }
        model.run(&sender, requests, AppCmd::Chat);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>, _root: &Self::Root) {
        match msg {
            AppMsg::PageShown(Page::Chat) => {
                let requests = self.chat.refresh_conversations();
                self.run(&sender, requests, AppCmd::Chat);
            }
            AppMsg::PageShown(Page::History) => {
                let requests = self.history.load_conversations(&mut self.history_view);
                self.run(&sender, requests, AppCmd::History);
            }
            AppMsg::NewChat => {
                let requests = self.chat.create_new_conversation(&mut self.chat_view);
                self.run(&sender, requests, AppCmd::Chat);
            }
            AppMsg::OpenConversation(id) => {
                let requests = self.chat.load_conversation(id, &mut self.chat_view);
                self.run(&sender, requests, AppCmd::Chat);
            }
            AppMsg::SendRequested(text) => {
                let requests = self.chat.send_message(&text, &mut self.chat_view);
                self.run(&sender, requests, AppCmd::Chat);
            }
            AppMsg::InputChanged(len) => {
                self.chat.input_changed(len, &mut self.chat_view);
            }
            AppMsg::ClearRequested => {
                self.chat.request_clear(&mut self.chat_view);
            }
            AppMsg::ClearConfirmed => {
                let requests = self.chat.confirm_clear();
                self.run(&sender, requests, AppCmd::Chat);
            }
            AppMsg::RefreshHistory => {
                let requests = self.history.load_conversations(&mut self.history_view);
                self.run(&sender, requests, AppCmd::History);
            }
            AppMsg::SearchChanged(term) => {
                self.history.set_search_term(&term, &mut self.history_view);
            }
            AppMsg::SortChanged(key) => {
                self.history.set_sort(key, &mut self.history_view);
            }
            AppMsg::ViewConversation(id) => {
                self.history.view_conversation(id, &mut self.history_view);
            }
            AppMsg::OpenInChat(id) => {
                self.view_stack.set_visible_child_name(Page::Chat.name());
                let requests = self.chat.load_conversation(id, &mut self.chat_view);
                self.run(&sender, requests, AppCmd::Chat);
            }
            AppMsg::ShowDeleteModal(id) => {
                self.history.show_delete_modal(id, &mut self.history_view);
            }
            AppMsg::HideDeleteModal => {
                self.history.hide_delete_modal(&mut self.history_view);
            }
            AppMsg::ConfirmDelete => {
                let requests = self.history.confirm_delete();
                self.run(&sender, requests, AppCmd::History);
            }
        }
    }

    fn update_cmd(
        &mut self,
        msg: Self::CommandOutput,
        sender: ComponentSender<Self>,
        _root: &Self::Root,
    ) {
        match msg {
            AppCmd::Chat(outcome) => {
                let requests = self.chat.complete(outcome, &mut self.chat_view);
                self.run(&sender, requests, AppCmd::Chat);
            }
            AppCmd::History(outcome) => {
                let removed = match &outcome {
                    ApiOutcome::Deleted(id, Ok(())) => Some(*id),
                    _ => None,
                };
                let requests = self.history.complete(outcome, &mut self.history_view);
                self.run(&sender, requests, AppCmd::History);

                // The chat page must not keep showing a deleted conversation.
                if let Some(id) = removed {
                    let requests = self.chat.conversation_removed(id, &mut self.chat_view);
                    self.run(&sender, requests, AppCmd::Chat);
                }
            }
            AppCmd::Health(ApiOutcome::Health(Ok(status))) if status.is_healthy() => {
                tracing::info!("Chat server is healthy");
            }
            AppCmd::Health(ApiOutcome::Health(Ok(status))) => {
                tracing::warn!(
                    "Chat server reports {}: {}",
                    status.status,
                    status.message.unwrap_or_default()
                );
            }
            AppCmd::Health(ApiOutcome::Health(Err(e))) => {
                tracing::warn!("Chat server is unreachable: {}", e);
            }
            AppCmd::Health(other) => {
                tracing::debug!("Ignoring unexpected health outcome: {:?}", other);
            }
        }
    }
}

impl App {
    /// Run each request on the command runtime; `route` tags the outcome
    /// for the page that issued it.
    fn run(&self, sender: &ComponentSender<Self>, requests: Vec<ApiRequest>, route: fn(ApiOutcome) -> AppCmd) {
        for request in requests {
            let api = Arc::clone(&self.api);
            sender.oneshot_command(async move { route(request.execute(api.as_ref()).await) });
        }
    }
}
