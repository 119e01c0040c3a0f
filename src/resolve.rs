// Identifier resolution: turn whatever URL the user pasted into a game id,
// and an upload id when the URL points straight at a CDN file.

use crate::api::{ApiClient, Transport};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_CDN_IDS: Regex = Regex::new(r"game/(\d+)/(\d+)").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRef {
    pub game_id: u64,
    pub version_id: Option<u64>,
}

/// Pull `game/<game>/<upload>` out of a CDN download URL.
pub fn parse_cdn_url(url: &str) -> Option<GameRef> {
    let caps = RE_CDN_IDS.captures(url)?;
    let game_id = caps[1].parse().ok()?;
    let version_id = caps[2].parse().ok()?;
    Some(GameRef {
        game_id,
        version_id: Some(version_id),
    })
}

/// CDN URLs are parsed locally; anything else is treated as a game page and
/// its `data.json` is fetched.
pub fn resolve<T: Transport>(api: &ApiClient<T>, url: &str) -> Option<GameRef> {
    let url = url.trim();
    if url.contains(api.config().cdn_host.as_str()) {
        let found = parse_cdn_url(url);
        tracing::info!(?found, "resolved CDN url");
        return found;
    }

    let game_id = api.page_game_id(url)?;
    tracing::info!(game_id, "resolved game page");
    Some(GameRef {
        game_id,
        version_id: None,
    })
}
