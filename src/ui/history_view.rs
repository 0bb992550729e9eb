use std::cell::Cell;
use std::rc::Rc;

use adw::prelude::*;
use relm4::factory::FactoryVecDeque;
use relm4::prelude::*;

use crate::controllers::{ConversationCard, ConversationListSurface, SortKey};
use crate::models::ConversationId;
use crate::ui::dialogs;

const CARDS_PAGE: &str = "cards";
const EMPTY_PAGE: &str = "empty";

// --- CardItem factory component ---

#[derive(Debug)]
pub struct CardItem {
    card: ConversationCard,
}

#[derive(Debug)]
pub enum CardItemOutput {
    View(ConversationId),
    Delete(ConversationId),
}

#[relm4::factory(pub)]
impl FactoryComponent for CardItem {
    type Init = ConversationCard;
    type Input = ();
    type Output = CardItemOutput;
    type CommandOutput = ();
    type ParentWidget = gtk::FlowBox;

    view! {
        gtk::Box {
            set_orientation: gtk::Orientation::Vertical,
            set_spacing: 8,
            add_css_class: "card",
            add_css_class: "conversation-card",

            gtk::Box {
                set_orientation: gtk::Orientation::Horizontal,
                set_spacing: 8,

                gtk::Label {
                    set_xalign: 0.0,
                    set_hexpand: true,
                    set_ellipsize: gtk::pango::EllipsizeMode::End,
                    set_markup: &format!("<b>{}</b>", self.card.title_markup),
                    add_css_class: "conversation-title",
                },

                gtk::Label {
                    set_label: &self.card.updated_label,
                    add_css_class: "dim-label",
                    add_css_class: "caption",
                },
            },

            gtk::Box {
                set_orientation: gtk::Orientation::Horizontal,
                set_spacing: 16,

                gtk::Box {
                    set_spacing: 4,
                    add_css_class: "dim-label",

                    gtk::Image {
                        set_icon_name: Some("user-available-symbolic"),
                    },
                    gtk::Label {
                        set_label: &self.card.message_count_label,
                    },
                },

                gtk::Box {
                    set_spacing: 4,
                    add_css_class: "dim-label",

                    gtk::Image {
                        set_icon_name: Some("x-office-calendar-symbolic"),
                    },
                    gtk::Label {
                        set_label: &self.card.created_label,
                    },
                },
            },

            gtk::Box {
                set_orientation: gtk::Orientation::Horizontal,
                set_spacing: 6,
                set_halign: gtk::Align::End,

                gtk::Button {
                    set_label: "View",
                    add_css_class: "flat",
                    connect_clicked[sender, id = self.card.id] => move |_| {
                        let _ = sender.output(CardItemOutput::View(id));
                    },
                },

                gtk::Button {
                    set_label: "Delete",
                    add_css_class: "flat",
                    add_css_class: "error",
                    connect_clicked[sender, id = self.card.id] => move |_| {
                        let _ = sender.output(CardItemOutput::Delete(id));
                    },
                },
            },
        }
    }

    fn init_model(card: Self::Init, _index: &DynamicIndex, _sender: FactorySender<Self>) -> Self {
        Self { card }
    }
}

// --- HistoryView component ---

/// The history page: searchable, sortable conversation cards.
pub struct HistoryView {
    cards: FactoryVecDeque<CardItem>,
    loading: bool,
    content_stack: gtk::Stack,
    delete_dialog: adw::Dialog,
    delete_dialog_open: Rc<Cell<bool>>,
}

#[derive(Debug)]
pub enum HistoryViewMsg {
    RenderCards(Vec<ConversationCard>),
    ShowEmpty,
    SetLoading(bool),
    SetDeleteModalVisible(bool),
    Alert(String),
    OpenInChat(ConversationId),
}

#[derive(Debug)]
pub enum HistoryViewOutput {
    Refresh,
    SearchChanged(String),
    SortChanged(SortKey),
    View(ConversationId),
    OpenInChat(ConversationId),
    ShowDeleteModal(ConversationId),
    HideDeleteModal,
    ConfirmDelete,
}

#[relm4::component(pub)]
impl Component for HistoryView {
    /// Sort order selected when the page opens.
    type Init = SortKey;
    type Input = HistoryViewMsg;
    type Output = HistoryViewOutput;
    type CommandOutput = ();

    view! {
        gtk::Box {
            set_orientation: gtk::Orientation::Vertical,

            gtk::Box {
                set_orientation: gtk::Orientation::Horizontal,
                set_spacing: 8,
                set_margin_top: 12,
                set_margin_bottom: 12,
                set_margin_start: 16,
                set_margin_end: 16,

                gtk::SearchEntry {
                    set_placeholder_text: Some("Search conversations..."),
                    set_hexpand: true,
                    connect_search_changed[sender] => move |entry| {
                        let _ = sender.output(HistoryViewOutput::SearchChanged(entry.text().to_string()));
                    },
                },

                #[local_ref]
                sort_dropdown -> gtk::DropDown {
                    set_tooltip_text: Some("Sort by"),
                    connect_selected_notify[sender] => move |dropdown| {
                        if let Some(key) = SortKey::ALL.get(dropdown.selected() as usize) {
                            let _ = sender.output(HistoryViewOutput::SortChanged(*key));
                        }
                    },
                },

                gtk::Spinner {
                    #[watch]
                    set_visible: model.loading,
                    #[watch]
                    set_spinning: model.loading,
                },

                gtk::Button {
                    set_icon_name: "view-refresh-symbolic",
                    set_tooltip_text: Some("Refresh"),
                    connect_clicked[sender] => move |_| {
                        let _ = sender.output(HistoryViewOutput::Refresh);
                    },
                },
            },

            #[local_ref]
            content_stack -> gtk::Stack {
                set_vexpand: true,
            },
        }
    }

    fn init(
        sort_by: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let cards = FactoryVecDeque::builder()
            .launch(gtk::FlowBox::default())
            .forward(sender.output_sender(), |output| match output {
                CardItemOutput::View(id) => HistoryViewOutput::View(id),
                CardItemOutput::Delete(id) => HistoryViewOutput::ShowDeleteModal(id),
            });

        let card_grid: &gtk::FlowBox = cards.widget();
        card_grid.set_selection_mode(gtk::SelectionMode::None);
        card_grid.set_homogeneous(true);
        card_grid.set_min_children_per_line(1);
        card_grid.set_max_children_per_line(3);
        card_grid.set_column_spacing(12);
        card_grid.set_row_spacing(12);
        card_grid.set_valign(gtk::Align::Start);
        card_grid.set_margin_start(16);
        card_grid.set_margin_end(16);
        card_grid.set_margin_bottom(16);

        let scrolled = gtk::ScrolledWindow::builder()
            .hscrollbar_policy(gtk::PolicyType::Never)
            .vexpand(true)
            .child(card_grid)
            .build();

        let empty_state = adw::StatusPage::builder()
            .icon_name("edit-find-symbolic")
            .title("No conversations")
            .description("Start chatting, or try a different search.")
            .build();

        let content_stack = gtk::Stack::new();
        content_stack.add_named(&scrolled, Some(CARDS_PAGE));
        content_stack.add_named(&empty_state, Some(EMPTY_PAGE));
        content_stack.set_visible_child_name(EMPTY_PAGE);

        let labels: Vec<&str> = SortKey::ALL.iter().map(|k| k.label()).collect();
        let sort_dropdown = gtk::DropDown::from_strings(&labels);
        let selected = SortKey::ALL.iter().position(|k| *k == sort_by).unwrap_or(0);
        sort_dropdown.set_selected(selected as u32);

        let delete_dialog_open = Rc::new(Cell::new(false));
        let delete_dialog = build_delete_dialog(sender.output_sender(), Rc::clone(&delete_dialog_open));

        let model = Self {
            cards,
            loading: false,
            content_stack: content_stack.clone(),
            delete_dialog,
            delete_dialog_open,
        };

        let widgets = view_output!();

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>, root: &Self::Root) {
        match msg {
            HistoryViewMsg::RenderCards(cards) => {
                let mut guard = self.cards.guard();
                guard.clear();
                for card in cards {
                    guard.push_back(card);
                }
                drop(guard);
                self.content_stack.set_visible_child_name(CARDS_PAGE);
            }
            HistoryViewMsg::ShowEmpty => {
                self.cards.guard().clear();
                self.content_stack.set_visible_child_name(EMPTY_PAGE);
            }
            HistoryViewMsg::SetLoading(loading) => {
                self.loading = loading;
            }
            HistoryViewMsg::SetDeleteModalVisible(visible) => {
                if visible != self.delete_dialog_open.get() {
                    self.delete_dialog_open.set(visible);
                    if visible {
                        self.delete_dialog.present(Some(root));
                    } else {
                        self.delete_dialog.force_close();
                    }
                }
            }
            HistoryViewMsg::Alert(message) => {
                dialogs::alert(root, &message);
            }
            HistoryViewMsg::OpenInChat(id) => {
                let _ = sender.output(HistoryViewOutput::OpenInChat(id));
            }
        }
    }
}

/// The delete confirmation stays open until it is explicitly closed, so a
/// failed delete can be retried.
fn build_delete_dialog(sender: &relm4::Sender<HistoryViewOutput>, open: Rc<Cell<bool>>) -> adw::Dialog {
    let body = gtk::Label::builder()
        .label("Delete this conversation? This cannot be undone.")
        .wrap(true)
        .build();

    let cancel_btn = gtk::Button::with_label("Cancel");
    cancel_btn.add_css_class("pill");
    let sender_cancel = sender.clone();
    cancel_btn.connect_clicked(move |_| sender_cancel.emit(HistoryViewOutput::HideDeleteModal));

    let delete_btn = gtk::Button::with_label("Delete");
    delete_btn.add_css_class("pill");
    delete_btn.add_css_class("destructive-action");
    let sender_delete = sender.clone();
    delete_btn.connect_clicked(move |_| sender_delete.emit(HistoryViewOutput::ConfirmDelete));

    let buttons = gtk::Box::builder()
        .orientation(gtk::Orientation::Horizontal)
        .spacing(12)
        .halign(gtk::Align::Center)
        .build();
    buttons.append(&cancel_btn);
    buttons.append(&delete_btn);

    let content = gtk::Box::builder()
        .orientation(gtk::Orientation::Vertical)
        .spacing(18)
        .margin_top(12)
        .margin_bottom(18)
        .margin_start(18)
        .margin_end(18)
        .build();
    content.append(&body);
    content.append(&buttons);

    let toolbar_view = adw::ToolbarView::new();
    toolbar_view.add_top_bar(&adw::HeaderBar::new());
    toolbar_view.set_content(Some(&content));

    let dialog = adw::Dialog::builder()
        .title("Delete Conversation")
        .content_width(360)
        .child(&toolbar_view)
        .build();

    // Close button, Escape and outside clicks land here, as do programmatic closes.
    let sender_closed = sender.clone();
    dialog.connect_closed(move |_| {
        if open.replace(false) {
            sender_closed.emit(HistoryViewOutput::HideDeleteModal);
        }
    });

    dialog
}

impl ConversationListSurface for Controller<HistoryView> {
    fn render_cards(&mut self, cards: &[ConversationCard]) {
        self.emit(HistoryViewMsg::RenderCards(cards.to_vec()));
    }

    fn show_empty_state(&mut self) {
        self.emit(HistoryViewMsg::ShowEmpty);
    }

    fn set_loading(&mut self, loading: bool) {
        self.emit(HistoryViewMsg::SetLoading(loading));
    }

    fn set_delete_modal_visible(&mut self, visible: bool) {
        self.emit(HistoryViewMsg::SetDeleteModalVisible(visible));
    }

    fn alert(&mut self, message: &str) {
        self.emit(HistoryViewMsg::Alert(message.to_string()));
    }

    fn open_in_chat(&mut self, id: ConversationId) {
        self.emit(HistoryViewMsg::OpenInChat(id));
    }
}
