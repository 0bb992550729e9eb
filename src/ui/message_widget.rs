use gtk::prelude::*;
use relm4::prelude::*;

use crate::controllers::MessageView;
use crate::models::Role;

/// One thread row: avatar, content bubble and time stamp.
#[derive(Debug)]
pub struct MessageRow {
    view: MessageView,
}

#[relm4::factory(pub)]
impl FactoryComponent for MessageRow {
    type Init = MessageView;
    type Input = ();
    type Output = ();
    type CommandOutput = ();
    type ParentWidget = gtk::Box;

    view! {
        gtk::Box {
            set_orientation: gtk::Orientation::Horizontal,
            set_spacing: 8,
            set_margin_top: 6,
            set_margin_bottom: 6,
            add_css_class: "message",
        }
    }

    fn init_model(view: Self::Init, _index: &DynamicIndex, _sender: FactorySender<Self>) -> Self {
        Self { view }
    }

    fn init_widgets(
        &mut self,
        _index: &DynamicIndex,
        root: Self::Root,
        _returned_widget: &<Self::ParentWidget as relm4::factory::FactoryView>::ReturnedWidget,
        _sender: FactorySender<Self>,
    ) -> Self::Widgets {
        let is_user = self.view.role == Role::User;
        root.add_css_class(self.view.role.as_str());

        let avatar = gtk::Image::from_icon_name(if is_user {
            "avatar-default-symbolic"
        } else {
            "computer-symbolic"
        });
        avatar.set_pixel_size(24);
        avatar.set_valign(gtk::Align::Start);
        avatar.add_css_class("message-avatar");

        let bubble = gtk::Box::builder()
            .orientation(gtk::Orientation::Vertical)
            .spacing(4)
            .build();
        bubble.add_css_class("message-content");

        let content = gtk::Label::builder()
            .wrap(true)
            .wrap_mode(gtk::pango::WrapMode::WordChar)
            .xalign(0.0)
            .selectable(true)
            .build();
        // Content that is not valid markup is shown as typed.
        if gtk::pango::parse_markup(&self.view.markup, '\0').is_ok() {
            content.set_markup(&self.view.markup);
        } else {
            content.set_text(&self.view.markup);
        }
        bubble.append(&content);

        let time = gtk::Label::builder()
            .label(self.view.time_label.as_str())
            .xalign(if is_user { 1.0 } else { 0.0 })
            .build();
        time.add_css_class("dim-label");
        time.add_css_class("caption");
        time.add_css_class("message-time");
        bubble.append(&time);

        if is_user {
            root.set_halign(gtk::Align::End);
            root.append(&bubble);
            root.append(&avatar);
        } else {
            root.set_halign(gtk::Align::Start);
            root.append(&avatar);
            root.append(&bubble);
        }

        let widgets = view_output!();
        widgets
    }
}
