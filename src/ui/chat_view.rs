use adw::prelude::*;
use relm4::factory::FactoryVecDeque;
use relm4::prelude::*;

use crate::controllers::chat::DEFAULT_TITLE;
use crate::controllers::{ChatSurface, MessageView, SidebarEntry};
use crate::models::ConversationId;
use crate::ui::dialogs;
use crate::ui::input_area::{InputArea, InputAreaMsg, InputAreaOutput};
use crate::ui::message_widget::MessageRow;
use crate::ui::sidebar::{Sidebar, SidebarMsg, SidebarOutput};

const WELCOME_PAGE: &str = "welcome";
const THREAD_PAGE: &str = "thread";

/// The chat page: sidebar, active thread and composer.
pub struct ChatView {
    sidebar: Controller<Sidebar>,
    messages: FactoryVecDeque<MessageRow>,
    input_area: Controller<InputArea>,
    title: String,
    loading: bool,
    thread_stack: gtk::Stack,
    scrolled_window: gtk::ScrolledWindow,
}

#[derive(Debug)]
pub enum ChatViewMsg {
    RenderConversations(Vec<SidebarEntry>),
    MarkActive(ConversationId),
    ShowWelcome,
    AppendMessage(MessageView),
    SetTitle(String),
    SetLoading(bool),
    SetSendEnabled(bool),
    SetCharCount(usize, usize),
    ResetInput,
    Alert(String),
    ConfirmClear(String),
}

#[derive(Debug)]
pub enum ChatViewOutput {
    NewChat,
    OpenConversation(ConversationId),
    Send(String),
    InputChanged(usize),
    ClearRequested,
    ClearConfirmed,
}

#[relm4::component(pub)]
impl Component for ChatView {
    type Init = ();
    type Input = ChatViewMsg;
    type Output = ChatViewOutput;
    type CommandOutput = ();

    view! {
        gtk::Box {
            set_orientation: gtk::Orientation::Horizontal,

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,
                set_width_request: 240,

                gtk::Button {
                    set_label: "New chat",
                    set_margin_all: 8,
                    add_css_class: "suggested-action",
                    connect_clicked[sender] => move |_| {
                        let _ = sender.output(ChatViewOutput::NewChat);
                    },
                },

                model.sidebar.widget().clone(),
            },

            gtk::Separator {
                set_orientation: gtk::Orientation::Vertical,
            },

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,
                set_hexpand: true,

                // Header: title, loading indicator, clear button
                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_spacing: 8,
                    set_margin_top: 8,
                    set_margin_bottom: 8,
                    set_margin_start: 16,
                    set_margin_end: 8,

                    gtk::Label {
                        set_xalign: 0.0,
                        set_hexpand: true,
                        set_ellipsize: gtk::pango::EllipsizeMode::End,
                        add_css_class: "title-3",
                        #[watch]
                        set_label: &model.title,
                    },

                    gtk::Spinner {
                        #[watch]
                        set_visible: model.loading,
                        #[watch]
                        set_spinning: model.loading,
                    },

                    gtk::Button {
                        set_icon_name: "user-trash-symbolic",
                        set_tooltip_text: Some("Clear conversation"),
                        add_css_class: "flat",
                        connect_clicked[sender] => move |_| {
                            let _ = sender.output(ChatViewOutput::ClearRequested);
                        },
                    },
                },

                gtk::Separator {
                    set_orientation: gtk::Orientation::Horizontal,
                },

                // Thread: welcome placeholder or message list
                #[local_ref]
                thread_stack -> gtk::Stack {
                    set_vexpand: true,
                },

                gtk::Separator {
                    set_orientation: gtk::Orientation::Horizontal,
                },

                model.input_area.widget().clone(),
            },
        }
    }

    fn init(
        _init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let sidebar = Sidebar::builder()
            .launch(())
            .forward(sender.output_sender(), |output| match output {
                SidebarOutput::ConversationSelected(id) => ChatViewOutput::OpenConversation(id),
            });

        let input_area = InputArea::builder()
            .launch(())
            .forward(sender.output_sender(), |output| match output {
                InputAreaOutput::Send(text) => ChatViewOutput::Send(text),
                InputAreaOutput::Changed(len) => ChatViewOutput::InputChanged(len),
            });

        let message_list = gtk::Box::builder()
            .orientation(gtk::Orientation::Vertical)
            .margin_top(8)
            .margin_bottom(8)
            .margin_start(16)
            .margin_end(16)
            .build();
        let messages = FactoryVecDeque::builder().launch(message_list).detach();

        let scrolled_window = gtk::ScrolledWindow::builder()
            .hscrollbar_policy(gtk::PolicyType::Never)
            .vexpand(true)
            .child(messages.widget())
            .build();

        let welcome = adw::StatusPage::builder()
            .icon_name("computer-symbolic")
            .title("Start a new conversation")
            .description("Type a message to start chatting with the AI assistant.")
            .build();

        let thread_stack = gtk::Stack::new();
        thread_stack.add_named(&welcome, Some(WELCOME_PAGE));
        thread_stack.add_named(&scrolled_window, Some(THREAD_PAGE));
        thread_stack.set_visible_child_name(WELCOME_PAGE);

        let model = Self {
            sidebar,
            messages,
            input_area,
            title: DEFAULT_TITLE.to_string(),
            loading: false,
            thread_stack: thread_stack.clone(),
            scrolled_window,
        };

        let widgets = view_output!();

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>, root: &Self::Root) {
        match msg {
            ChatViewMsg::RenderConversations(entries) => {
                self.sidebar.emit(SidebarMsg::Render(entries));
            }
            ChatViewMsg::MarkActive(id) => {
                self.sidebar.emit(SidebarMsg::MarkActive(id));
            }
            ChatViewMsg::ShowWelcome => {
                self.messages.guard().clear();
                self.thread_stack.set_visible_child_name(WELCOME_PAGE);
            }
            ChatViewMsg::AppendMessage(view) => {
                self.messages.guard().push_back(view);
                self.thread_stack.set_visible_child_name(THREAD_PAGE);
                self.scroll_to_bottom();
            }
            ChatViewMsg::SetTitle(title) => {
                self.title = title;
            }
            ChatViewMsg::SetLoading(loading) => {
                self.loading = loading;
            }
            ChatViewMsg::SetSendEnabled(enabled) => {
                self.input_area.emit(InputAreaMsg::SetSendEnabled(enabled));
            }
            ChatViewMsg::SetCharCount(count, max) => {
                self.input_area.emit(InputAreaMsg::SetCharCount(count, max));
            }
            ChatViewMsg::ResetInput => {
                self.input_area.emit(InputAreaMsg::Reset);
            }
            ChatViewMsg::Alert(message) => {
                dialogs::alert(root, &message);
            }
            ChatViewMsg::ConfirmClear(prompt) => {
                dialogs::confirm(root, &prompt, "Clear", move || {
                    let _ = sender.output(ChatViewOutput::ClearConfirmed);
                });
            }
        }
    }
}

impl ChatView {
    fn scroll_to_bottom(&self) {
        let adj = self.scrolled_window.vadjustment();
        // Wait for the new row to be allocated so `upper` is current.
        glib::idle_add_local_once(move || {
            adj.set_value(adj.upper() - adj.page_size());
        });
    }
}

impl ChatSurface for Controller<ChatView> {
    fn render_conversations(&mut self, entries: &[SidebarEntry]) {
        self.emit(ChatViewMsg::RenderConversations(entries.to_vec()));
    }

    fn mark_active(&mut self, id: ConversationId) {
        self.emit(ChatViewMsg::MarkActive(id));
    }

    fn show_welcome(&mut self) {
        self.emit(ChatViewMsg::ShowWelcome);
    }

    fn append_message(&mut self, message: &MessageView) {
        self.emit(ChatViewMsg::AppendMessage(message.clone()));
    }

    fn set_title(&mut self, title: &str) {
        self.emit(ChatViewMsg::SetTitle(title.to_string()));
    }

    fn set_loading(&mut self, loading: bool) {
        self.emit(ChatViewMsg::SetLoading(loading));
    }

    fn set_send_enabled(&mut self, enabled: bool) {
        self.emit(ChatViewMsg::SetSendEnabled(enabled));
    }

    fn set_char_count(&mut self, count: usize, max: usize) {
        self.emit(ChatViewMsg::SetCharCount(count, max));
    }

    fn reset_input(&mut self) {
        self.emit(ChatViewMsg::ResetInput);
    }

    fn alert(&mut self, message: &str) {
        self.emit(ChatViewMsg::Alert(message.to_string()));
    }

    fn confirm_clear(&mut self, prompt: &str) {
        self.emit(ChatViewMsg::ConfirmClear(prompt.to_string()));
    }
}
