// One user action end to end: resolve the URL, look up uploads, copy the
// result and tell the user what happened.

use crate::api::{to_pretty_json, ApiClient, Transport, UploadRecord};
use crate::clipboard::ClipboardSink;
use crate::error::LookupError;
use crate::lookup::{lookup, Mode};
use crate::notify::Notifier;
use crate::resolve::resolve;
use anyhow::Result;

/// Lets the front end choose one upload out of several.
pub trait UploadPicker {
    /// Index into `uploads`, or `None` if the user backed out.
    fn pick(&self, uploads: &[UploadRecord]) -> Result<Option<usize>>;
}

/// What to do when more than one upload is selected.
#[derive(Clone, Copy)]
pub enum EmitPolicy<'a> {
    /// Copy each upload in order; the clipboard keeps only the last one.
    EachInOrder,
    /// Ask the picker and copy just the chosen upload.
    Pick(&'a dyn UploadPicker),
}

#[derive(Debug)]
pub enum Outcome {
    Copied { count: usize },
    NoUploads,
    Cancelled,
    Failed(LookupError),
}

pub fn extract<T: Transport>(
    api: &ApiClient<T>,
    url: &str,
    mode: Mode,
    policy: EmitPolicy<'_>,
    clipboard: &mut dyn ClipboardSink,
    notifier: &dyn Notifier,
) -> Result<Outcome> {
    // Resolve first; without a game id there is nothing to look up, so an
    // unresolved URL short-circuits before any API call.
    let uploads = resolve(api, url)
        .ok_or_else(|| LookupError::Unresolved {
            url: url.trim().to_string(),
        })
        .and_then(|game| lookup(api, game, mode));

    let uploads = match uploads {
        Ok(uploads) => uploads,
        Err(err) => {
            // Lookup errors are shown to the user, never returned.
            tracing::warn!(%mode, "lookup failed: {}", err);
            notifier.notify(err.title(), &err.message());
            return Ok(Outcome::Failed(err));
        }
    };

    if uploads.is_empty() {
        notifier.notify("No Uploads", "The API returned no uploads for this game.");
        return Ok(Outcome::NoUploads);
    }

    // A single upload is copied directly; several go through the policy.
    let chosen: Vec<&UploadRecord> = match policy {
        EmitPolicy::Pick(picker) if uploads.len() > 1 => match picker.pick(&uploads)? {
            Some(i) if i < uploads.len() => vec![&uploads[i]],
            _ => return Ok(Outcome::Cancelled),
        },
        _ => uploads.iter().collect(),
    };

    // Each write replaces the previous one, so with `EachInOrder` the
    // clipboard ends up holding the last upload.
    for upload in &chosen {
        clipboard.copy(&to_pretty_json(upload)?)?;
    }
    tracing::info!(count = chosen.len(), "copied upload metadata");

    if chosen.len() == 1 {
        notifier.notify("Clipboard", "Copied the metadata to the clipboard!");
    } else {
        notifier.notify(
            "Clipboard",
            &format!(
                "Copied {} uploads in turn; the clipboard holds the last one.",
                chosen.len()
            ),
        );
    }
    Ok(Outcome::Copied {
        count: chosen.len(),
    })
}
