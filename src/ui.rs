// UI layer: an interactive menu using `dialoguer`. Picking a mode asks for
// a URL and runs that mode only; the spinner from `indicatif` runs while a
// request is in flight.

use crate::api::{ApiClient, HttpResponse, Transport, UploadRecord};
use crate::clipboard::ClipboardSink;
use crate::extract::{extract, EmitPolicy, UploadPicker};
use crate::lookup::Mode;
use crate::notify::Notifier;
use anyhow::Result;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const URL_PROMPT: &str =
    "Enter the Itch.io download URL (if Web GUI) or page URL (if Butler)";

/// Main interactive menu. Runs until the user chooses "Exit".
pub fn main_menu<T: Transport>(
    api: &ApiClient<T>,
    clipboard: &mut dyn ClipboardSink,
    notifier: &dyn Notifier,
) -> Result<()> {
    loop {
        let items = vec![
            "Extract Itch.io metadata (free)",
            "Extract Itch.io metadata (paid)",
            "Exit",
        ];
        // `Select` shows a keyboard-navigable list: arrow keys and Enter.
        let selection = Select::new()
            .with_prompt("Choose operation")
            .items(&items)
            .default(0)
            .interact()?;
        // Each entry runs only its own mode, like the two launcher buttons.
        let mode = match selection {
            0 => Mode::Free,
            1 => Mode::Paid,
            _ => break,
        };
        handle_extract(api, mode, clipboard, notifier)?;
    }
    Ok(())
}

/// Ask for a URL and run one extraction. Failures are printed, the menu
/// keeps going.
fn handle_extract<T: Transport>(
    api: &ApiClient<T>,
    mode: Mode,
    clipboard: &mut dyn ClipboardSink,
    notifier: &dyn Notifier,
) -> Result<()> {
    // `Input::interact_text()` prompts for a line of text and returns it.
    let url: String = Input::new().with_prompt(URL_PROMPT).interact_text()?;
    // In the menu the user picks one upload instead of getting only the
    // last of several copies.
    match extract(
        api,
        &url,
        mode,
        EmitPolicy::Pick(&TerminalPicker),
        clipboard,
        notifier,
    ) {
        Ok(outcome) => tracing::debug!(?outcome, "extraction finished"),
        Err(e) => println!("Extraction failed: {:#}", e),
    }
    Ok(())
}

/// Keyboard-driven list of uploads; Esc backs out.
pub struct TerminalPicker;

impl UploadPicker for TerminalPicker {
    fn pick(&self, uploads: &[UploadRecord]) -> Result<Option<usize>> {
        // `interact_opt` returns None when the user presses Esc or q.
        let labels: Vec<String> = uploads.iter().map(UploadRecord::label).collect();
        let choice = Select::new()
            .with_prompt("Several uploads found, pick one to copy")
            .items(&labels)
            .default(0)
            .interact_opt()?;
        Ok(choice)
    }
}

/// Shows a spinner around every request of the wrapped transport.
pub struct SpinnerTransport<T> {
    inner: T,
}

impl<T> SpinnerTransport<T> {
    pub fn new(inner: T) -> Self {
        SpinnerTransport { inner }
    }
}

impl<T: Transport> Transport for SpinnerTransport<T> {
    fn get(&self, url: &str, authorization: Option<&str>) -> Result<HttpResponse> {
        // The message stays generic: the URL may carry the API key.
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
        spinner.set_message("Fetching...");
        // Tick on a background thread; the request below blocks this one.
        spinner.enable_steady_tick(Duration::from_millis(100));
        let res = self.inner.get(url, authorization);
        // Clear the line so the next prompt or message starts clean.
        spinner.finish_and_clear();
        res
    }
}
