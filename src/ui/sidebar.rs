use gtk::prelude::*;
use relm4::factory::FactoryVecDeque;
use relm4::prelude::*;

use crate::controllers::SidebarEntry;
use crate::models::ConversationId;

// --- ConversationRow factory component ---

#[derive(Debug)]
pub struct ConversationRow {
    entry: SidebarEntry,
}

#[relm4::factory(pub)]
impl FactoryComponent for ConversationRow {
    type Init = SidebarEntry;
    type Input = ();
    type Output = ();
    type CommandOutput = ();
    type ParentWidget = gtk::ListBox;

    view! {
        gtk::Box {
            set_orientation: gtk::Orientation::Vertical,
            set_spacing: 2,
            set_margin_all: 6,
            add_css_class: "conversation-row",
            #[watch]
            set_class_active: ("active", self.entry.active),

            gtk::Label {
                set_label: &self.entry.title,
                set_xalign: 0.0,
                set_ellipsize: gtk::pango::EllipsizeMode::End,
                add_css_class: "conversation-title",
            },

            gtk::Label {
                set_label: &self.entry.time_label,
                set_xalign: 0.0,
                add_css_class: "dim-label",
                add_css_class: "caption",
            },
        }
    }

    fn init_model(entry: Self::Init, _index: &DynamicIndex, _sender: FactorySender<Self>) -> Self {
        Self { entry }
    }
}

// --- Sidebar component ---

/// Conversation list beside the chat thread.
pub struct Sidebar {
    rows: FactoryVecDeque<ConversationRow>,
}

#[derive(Debug)]
pub enum SidebarMsg {
    Render(Vec<SidebarEntry>),
    MarkActive(ConversationId),
    RowActivated(usize),
}

#[derive(Debug)]
pub enum SidebarOutput {
    ConversationSelected(ConversationId),
}

#[relm4::component(pub)]
impl Component for Sidebar {
    type Init = ();
    type Input = SidebarMsg;
    type Output = SidebarOutput;
    type CommandOutput = ();

    view! {
        gtk::ScrolledWindow {
            set_hscrollbar_policy: gtk::PolicyType::Never,
            set_vexpand: true,

            #[local_ref]
            conversation_list -> gtk::ListBox {
                set_selection_mode: gtk::SelectionMode::Single,
                add_css_class: "navigation-sidebar",
                connect_row_activated[sender] => move |_, row| {
                    if let Ok(index) = usize::try_from(row.index()) {
                        sender.input(SidebarMsg::RowActivated(index));
                    }
                },
            },
        }
    }

    fn init(
        _init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let rows = FactoryVecDeque::builder()
            .launch(gtk::ListBox::default())
            .detach();

        let model = Self { rows };

        let conversation_list = model.rows.widget();
        let widgets = view_output!();

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>, _root: &Self::Root) {
        match msg {
            SidebarMsg::Render(entries) => {
                let active = entries.iter().position(|e| e.active);
                let mut guard = self.rows.guard();
                guard.clear();
                for entry in entries {
                    guard.push_back(entry);
                }
                drop(guard);
                self.select_row(active);
            }
            SidebarMsg::MarkActive(id) => {
                let mut active = None;
                let mut guard = self.rows.guard();
                for index in 0..guard.len() {
                    if let Some(row) = guard.get_mut(index) {
                        row.entry.active = row.entry.id == id;
                        if row.entry.active {
                            active = Some(index);
                        }
                    }
                }
                drop(guard);
                self.select_row(active);
            }
            SidebarMsg::RowActivated(index) => {
                if let Some(row) = self.rows.get(index) {
                    let _ = sender.output(SidebarOutput::ConversationSelected(row.entry.id));
                }
            }
        }
    }
}

impl Sidebar {
    fn select_row(&self, index: Option<usize>) {
        let list = self.rows.widget();
        let row = index
            .and_then(|i| i32::try_from(i).ok())
            .and_then(|i| list.row_at_index(i));
        match row {
            Some(row) => list.select_row(Some(&row)),
            None => list.unselect_all(),
        }
    }
}
