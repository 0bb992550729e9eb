use adw::prelude::*;

use crate::config;

/// Modal message with a single OK button.
pub fn alert(parent: &impl IsA<gtk::Widget>, message: &str) {
    let dialog = adw::AlertDialog::builder()
        .heading(config::APP_NAME)
        .body(message)
        .build();
    dialog.add_response("ok", "OK");
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.present(Some(parent));
}

/// Yes/no question. `on_confirm` runs only on the destructive answer.
pub fn confirm<F>(parent: &impl IsA<gtk::Widget>, heading: &str, confirm_label: &str, on_confirm: F)
where
    F: Fn() + 'static,
{
    let dialog = adw::AlertDialog::builder().heading(heading).build();
    dialog.add_response("cancel", "Cancel");
    dialog.add_response("confirm", confirm_label);
    dialog.set_response_appearance("confirm", adw::ResponseAppearance::Destructive);
    dialog.set_default_response(Some("cancel"));
    dialog.set_close_response("cancel");
    dialog.connect_response(None, move |_dialog, response| {
        if response == "confirm" {
            on_confirm();
        }
    });
    dialog.present(Some(parent));
}
