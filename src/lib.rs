// Library root
// -----------
// This crate exposes the pieces the `itch-meta` binary wires together.
//
// Module responsibilities:
// - `config`: API bases, CDN host and the static API key.
// - `api`: HTTP interactions with itch.io and the typed records they return.
// - `resolve`: turns a pasted URL into a game id (and maybe an upload id).
// - `lookup`: fetches uploads in free or paid mode and applies the filter.
// - `extract`: one user action end to end, down to the clipboard.
// - `clipboard` / `notify`: the output seams (clipboard, messages).
// - `ui`: the interactive terminal menu.
// - `logging`: tracing setup.
pub mod api;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod lookup;
pub mod notify;
pub mod resolve;
pub mod ui;

#[cfg(test)]
pub(crate) mod testing;
