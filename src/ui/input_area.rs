use gtk::prelude::*;
use relm4::prelude::*;

use crate::config::{INPUT_MAX_HEIGHT, MAX_MESSAGE_LENGTH};

/// Message composer: auto-growing text view, character counter, send button.
pub struct InputArea {
    buffer: gtk::TextBuffer,
    char_count: usize,
    max_length: usize,
    send_enabled: bool,
}

#[derive(Debug)]
pub enum InputAreaMsg {
    SendClicked,
    Reset,
    SetCharCount(usize, usize),
    SetSendEnabled(bool),
    // Internal
    TextChanged,
}

#[derive(Debug)]
pub enum InputAreaOutput {
    Send(String),
    /// Input length in characters.
    Changed(usize),
}

#[relm4::component(pub)]
impl Component for InputArea {
    type Init = ();
    type Input = InputAreaMsg;
    type Output = InputAreaOutput;
    type CommandOutput = ();

    view! {
        gtk::Box {
            set_orientation: gtk::Orientation::Horizontal,
            set_spacing: 8,
            set_margin_top: 8,
            set_margin_bottom: 12,
            set_margin_start: 12,
            set_margin_end: 12,

            // Natural height tracks the content until the cap, then it scrolls.
            gtk::ScrolledWindow {
                set_hscrollbar_policy: gtk::PolicyType::Never,
                set_propagate_natural_height: true,
                set_max_content_height: INPUT_MAX_HEIGHT,
                set_hexpand: true,
                add_css_class: "card",

                #[name = "text_view"]
                gtk::TextView {
                    set_wrap_mode: gtk::WrapMode::WordChar,
                    set_accepts_tab: false,
                    set_top_margin: 8,
                    set_bottom_margin: 8,
                    set_left_margin: 8,
                    set_right_margin: 8,
                    add_css_class: "message-input",

                    set_buffer: Some(&model.buffer),
                },
            },

            gtk::Label {
                set_valign: gtk::Align::End,
                add_css_class: "dim-label",
                add_css_class: "caption",
                add_css_class: "char-count",
                #[watch]
                set_label: &format!("{}/{}", model.char_count, model.max_length),
            },

            gtk::Button {
                set_icon_name: "mail-send-symbolic",
                set_tooltip_text: Some("Send"),
                set_valign: gtk::Align::End,
                add_css_class: "suggested-action",
                add_css_class: "circular",
                #[watch]
                set_sensitive: model.send_enabled,
                connect_clicked => InputAreaMsg::SendClicked,
            },
        }
    }

    fn init(
        _init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let buffer = gtk::TextBuffer::new(None::<&gtk::TextTagTable>);

        let model = Self {
            buffer: buffer.clone(),
            char_count: 0,
            max_length: MAX_MESSAGE_LENGTH,
            send_enabled: false,
        };

        let widgets = view_output!();

        // Enter sends, Shift+Enter inserts a newline.
        let sender_key = sender.clone();
        let key_controller = gtk::EventControllerKey::new();
        key_controller.connect_key_pressed(move |_, key, _code, modifier| {
            let is_enter = key == gtk::gdk::Key::Return || key == gtk::gdk::Key::KP_Enter;
            if is_enter && !modifier.contains(gtk::gdk::ModifierType::SHIFT_MASK) {
                sender_key.input(InputAreaMsg::SendClicked);
                glib::Propagation::Stop
            } else {
                glib::Propagation::Proceed
            }
        });
        widgets.text_view.add_controller(key_controller);

        let sender_buf = sender.clone();
        buffer.connect_changed(move |_| {
            sender_buf.input(InputAreaMsg::TextChanged);
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>, _root: &Self::Root) {
        match msg {
            InputAreaMsg::SendClicked => {
                let _ = sender.output(InputAreaOutput::Send(self.text()));
            }
            InputAreaMsg::Reset => {
                self.buffer.set_text("");
            }
            InputAreaMsg::SetCharCount(count, max) => {
                self.char_count = count;
                self.max_length = max;
            }
            InputAreaMsg::SetSendEnabled(enabled) => {
                self.send_enabled = enabled;
            }
            InputAreaMsg::TextChanged => {
                let len = usize::try_from(self.buffer.char_count()).unwrap_or_default();
                let _ = sender.output(InputAreaOutput::Changed(len));
            }
        }
    }
}

impl InputArea {
    fn text(&self) -> String {
        let (start, end) = self.buffer.bounds();
        self.buffer.text(&start, &end, false).to_string()
    }
}
