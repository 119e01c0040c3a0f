// Clipboard sink: one UTF-8 string, replacing whatever was there.

use anyhow::{Context, Result};
use arboard::Clipboard;
use std::time::Duration;

pub trait ClipboardSink {
    fn copy(&mut self, text: &str) -> Result<()>;

    /// Called once before the process exits, after the last copy.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// System clipboard through arboard. On X11/Wayland the contents are served
/// by this process, so `finish` keeps serving the last copy for up to `hold`
/// or until another program (usually a clipboard manager) takes it over.
pub struct SystemClipboard {
    inner: Clipboard,
    hold: Duration,
    last: Option<String>,
}

impl SystemClipboard {
    pub fn new(hold: Duration) -> Result<Self> {
        let inner = Clipboard::new().context("Failed to access system clipboard")?;
        Ok(SystemClipboard {
            inner,
            hold,
            last: None,
        })
    }
}

impl ClipboardSink for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        self.inner
            .set_text(text.to_owned())
            .context("Failed to copy text to clipboard")?;
        self.last = Some(text.to_owned());
        Ok(())
    }

    #[cfg(target_os = "linux")]
    fn finish(&mut self) -> Result<()> {
        use arboard::SetExtLinux;
        use std::time::Instant;

        let Some(text) = self.last.take() else {
            return Ok(());
        };
        if self.hold.is_zero() {
            return Ok(());
        }
        tracing::debug!(hold = ?self.hold, "serving clipboard until handed off");
        // Re-set the same text and block until someone else owns the
        // selection or the deadline passes.
        self.inner
            .set()
            .wait_until(Instant::now() + self.hold)
            .text(text)
            .context("Failed to hand off clipboard contents")
    }
}

/// Writes each document to stdout, then forwards it to the wrapped sink.
pub struct EchoClipboard<C> {
    pub inner: C,
}

impl<C: ClipboardSink> ClipboardSink for EchoClipboard<C> {
    fn copy(&mut self, text: &str) -> Result<()> {
        println!("{}", text);
        self.inner.copy(text)
    }

    fn finish(&mut self) -> Result<()> {
        self.inner.finish()
    }
}

/// Stdout only, used with `--print` when no clipboard is reachable.
pub struct StdoutSink;

impl ClipboardSink for StdoutSink {
    fn copy(&mut self, text: &str) -> Result<()> {
        println!("{}", text);
        Ok(())
    }
}

/// Pick the sink for this run. With `print`, every document also goes to
/// stdout, and a clipboard that failed to open is not fatal.
pub fn choose_sink<C: ClipboardSink + 'static>(
    opened: Result<C>,
    print: bool,
) -> Result<Box<dyn ClipboardSink>> {
    match (opened, print) {
        (Ok(clipboard), false) => Ok(Box::new(clipboard)),
        (Ok(clipboard), true) => Ok(Box::new(EchoClipboard { inner: clipboard })),
        (Err(e), true) => {
            tracing::warn!("clipboard unavailable, printing only: {:#}", e);
            Ok(Box::new(StdoutSink))
        }
        (Err(e), false) => Err(e.context("Use --print to write the metadata to stdout instead")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingClipboard;
    use anyhow::anyhow;

    #[test]
    fn echo_forwards_to_inner_sink() {
        let mut sink = EchoClipboard {
            inner: RecordingClipboard::default(),
        };
        sink.copy("one").unwrap();
        sink.copy("two").unwrap();
        sink.finish().unwrap();
        assert_eq!(sink.inner.current(), Some("two"));
        assert_eq!(sink.inner.history.len(), 2);
        assert!(sink.inner.finished);
    }

    #[test]
    fn print_falls_back_to_stdout_without_a_clipboard() {
        let opened: Result<RecordingClipboard> = Err(anyhow!("no display"));
        let mut sink = choose_sink(opened, true).unwrap();
        sink.copy("{}").unwrap();
        sink.finish().unwrap();
    }

    #[test]
    fn missing_clipboard_is_fatal_without_print() {
        let opened: Result<RecordingClipboard> = Err(anyhow!("no display"));
        let err = choose_sink(opened, false).err().unwrap();
        assert!(format!("{:#}", err).contains("no display"));
        assert!(err.to_string().contains("--print"));
    }

    #[test]
    fn working_clipboard_is_used_as_is() {
        let sink = choose_sink(Ok(RecordingClipboard::default()), false);
        assert!(sink.is_ok());
    }
}
