// User-facing messages: a title and a body, acknowledged and dismissed.

use crossterm::style::Stylize;

pub trait Notifier {
    fn notify(&self, title: &str, message: &str);
}

/// Prints the message to the terminal, title highlighted.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, title: &str, message: &str) {
        println!("{}: {}", title.yellow().bold(), message);
    }
}

/// Native warning dialog with a single OK button. Blocks until dismissed.
pub struct DialogNotifier;

impl Notifier for DialogNotifier {
    fn notify(&self, title: &str, message: &str) {
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Warning)
            .set_title(title)
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}

/// Picks the notifier for the `--dialogs` flag.
pub fn notifier(dialogs: bool) -> Box<dyn Notifier> {
    if dialogs {
        Box::new(DialogNotifier)
    } else {
        Box::new(ConsoleNotifier)
    }
}
