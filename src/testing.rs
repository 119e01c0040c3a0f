// Fakes for the three seams: HTTP, clipboard and user messages.

use crate::api::{HttpResponse, Transport, UploadRecord};
use crate::clipboard::ClipboardSink;
use crate::config::{Config, Credential};
use crate::extract::UploadPicker;
use crate::notify::Notifier;
use anyhow::{anyhow, Result};
use std::cell::RefCell;
use std::collections::HashMap;

pub fn test_config() -> Config {
    Config::with_credential(Credential::new("KEY"))
}

#[derive(Debug, Clone)]
pub struct Call {
    pub url: String,
    pub authorization: Option<String>,
}

/// Scripted responses keyed by exact URL. Unknown URLs fail like a refused
/// connection.
#[derive(Default)]
pub struct FakeTransport {
    responses: HashMap<String, (u16, String)>,
    failures: HashMap<String, String>,
    calls: RefCell<Vec<Call>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, status: u16, body: &str) -> Self {
        self.responses
            .insert(url.to_string(), (status, body.to_string()));
        self
    }

    /// The transport itself fails for `url`, e.g. the body could not be read.
    pub fn fail(mut self, url: &str, reason: &str) -> Self {
        self.failures.insert(url.to_string(), reason.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.url.clone()).collect()
    }
}

impl Transport for FakeTransport {
    fn get(&self, url: &str, authorization: Option<&str>) -> Result<HttpResponse> {
        self.calls.borrow_mut().push(Call {
            url: url.to_string(),
            authorization: authorization.map(str::to_string),
        });
        if let Some(reason) = self.failures.get(url) {
            return Err(anyhow!("{}", reason.clone()));
        }
        match self.responses.get(url) {
            Some((status, body)) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            None => Err(anyhow!("connection refused: {}", url)),
        }
    }
}

/// Single-slot clipboard that also remembers every write.
#[derive(Default)]
pub struct RecordingClipboard {
    pub history: Vec<String>,
    pub finished: bool,
}

impl RecordingClipboard {
    pub fn current(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }
}

impl ClipboardSink for RecordingClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        self.history.push(text.to_string());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: RefCell<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn titles(&self) -> Vec<String> {
        self.messages.borrow().iter().map(|(t, _)| t.clone()).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, message: &str) {
        self.messages
            .borrow_mut()
            .push((title.to_string(), message.to_string()));
    }
}

/// Always answers with the same choice.
pub struct FixedPicker(pub Option<usize>);

impl UploadPicker for FixedPicker {
    fn pick(&self, _uploads: &[UploadRecord]) -> Result<Option<usize>> {
        Ok(self.0)
    }
}
