// Upload lookup for a resolved game, in free or paid mode.

use crate::api::{ApiClient, Transport, UploadRecord};
use crate::error::LookupError;
use crate::resolve::GameRef;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Uploads visible with the API key alone.
    Free,
    /// Uploads unlocked by one of the user's download keys.
    Paid,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Free => f.write_str("free"),
            Mode::Paid => f.write_str("paid"),
        }
    }
}

/// Fetch the uploads for `game` and apply the version filter.
pub fn lookup<T: Transport>(
    api: &ApiClient<T>,
    game: GameRef,
    mode: Mode,
) -> Result<Vec<UploadRecord>, LookupError> {
    let uploads = match mode {
        Mode::Free => api.game_uploads(game.game_id)?,
        Mode::Paid => {
            let keys = api.owned_keys()?;
            let key = keys
                .iter()
                .find(|k| k.game_id == game.game_id)
                .ok_or(LookupError::NotOwned {
                    game_id: game.game_id,
                })?;
            tracing::debug!(key_id = key.id, "found download key");
            api.key_uploads(game.game_id, key.id)?
        }
    };
    tracing::info!(%mode, game_id = game.game_id, count = uploads.len(), "fetched uploads");
    select_uploads(uploads, game)
}

/// With a version id, keep only the first upload carrying it; otherwise
/// keep everything.
pub fn select_uploads(
    uploads: Vec<UploadRecord>,
    game: GameRef,
) -> Result<Vec<UploadRecord>, LookupError> {
    let Some(version_id) = game.version_id else {
        return Ok(uploads);
    };
    uploads
        .into_iter()
        .find(|u| u.id() == Some(version_id))
        .map(|u| vec![u])
        .ok_or(LookupError::VersionNotFound {
            game_id: game.game_id,
            version_id,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_config, FakeTransport};

    const OWNED_KEYS: &str = "https://itch.io/api/1/KEY/my-owned-keys";

    fn game(game_id: u64, version_id: Option<u64>) -> GameRef {
        GameRef {
            game_id,
            version_id,
        }
    }

    fn ids(uploads: &[UploadRecord]) -> Vec<Option<u64>> {
        uploads.iter().map(UploadRecord::id).collect()
    }

    #[test]
    fn free_mode_filters_to_version() {
        let api = ApiClient::new(
            FakeTransport::new().respond(
                "https://itch.io/api/1/KEY/game/123/uploads",
                200,
                r#"{"uploads": [{"id": 455}, {"id": "456"}, {"id": 456, "filename": "dup"}]}"#,
            ),
            test_config(),
        );
        let uploads = lookup(&api, game(123, Some(456)), Mode::Free).unwrap();
        assert_eq!(ids(&uploads), vec![Some(456)]);
        assert_eq!(uploads[0].filename(), None);
    }

    #[test]
    fn free_mode_without_version_keeps_all() {
        let api = ApiClient::new(
            FakeTransport::new().respond(
                "https://itch.io/api/1/KEY/game/1/uploads",
                200,
                r#"{"uploads": [{"id": 1}, {"id": 2}, {"id": 3}]}"#,
            ),
            test_config(),
        );
        let uploads = lookup(&api, game(1, None), Mode::Free).unwrap();
        assert_eq!(ids(&uploads), vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn unknown_version_is_reported() {
        let api = ApiClient::new(
            FakeTransport::new().respond(
                "https://itch.io/api/1/KEY/game/1/uploads",
                200,
                r#"{"uploads": [{"id": 1}]}"#,
            ),
            test_config(),
        );
        let err = lookup(&api, game(1, Some(99)), Mode::Free).unwrap_err();
        assert!(matches!(
            err,
            LookupError::VersionNotFound {
                game_id: 1,
                version_id: 99
            }
        ));
    }

    #[test]
    fn paid_mode_not_owned_stops_after_key_list() {
        let api = ApiClient::new(
            FakeTransport::new().respond(
                OWNED_KEYS,
                200,
                r#"{"owned_keys": [{"id": 5, "game_id": 77}]}"#,
            ),
            test_config(),
        );
        let err = lookup(&api, game(123, None), Mode::Paid).unwrap_err();
        assert!(matches!(err, LookupError::NotOwned { game_id: 123 }));
        assert_eq!(api.transport().urls(), vec![OWNED_KEYS]);
    }

    #[test]
    fn paid_mode_uses_first_matching_key() {
        let api = ApiClient::new(
            FakeTransport::new()
                .respond(
                    OWNED_KEYS,
                    200,
                    r#"{"owned_keys": [{"id": 5, "game_id": 77}, {"id": 6, "game_id": 123}, {"id": 7, "game_id": 123}]}"#,
                )
                .respond(
                    "https://api.itch.io/games/123/uploads?download_key_id=6",
                    200,
                    r#"{"uploads": [{"id": 10}, {"id": 11}]}"#,
                ),
            test_config(),
        );
        let uploads = lookup(&api, game(123, Some(11)), Mode::Paid).unwrap();
        assert_eq!(ids(&uploads), vec![Some(11)]);

        let calls = api.transport().calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].authorization, None);
        assert_eq!(calls[1].authorization.as_deref(), Some("KEY"));
    }

    #[test]
    fn paid_mode_key_list_failure_is_api_error() {
        let api = ApiClient::new(
            FakeTransport::new().respond(OWNED_KEYS, 401, r#"{"errors": ["invalid key"]}"#),
            test_config(),
        );
        let err = lookup(&api, game(1, None), Mode::Paid).unwrap_err();
        assert_eq!(err.title(), "API Error");
        assert_eq!(err.message(), "Unable to fetch data from the API.");
    }

    #[test]
    fn paid_mode_uploads_failure_names_uploads_api() {
        let api = ApiClient::new(
            FakeTransport::new()
                .respond(OWNED_KEYS, 200, r#"{"owned_keys": [{"id": 6, "game_id": 1}]}"#)
                .respond(
                    "https://api.itch.io/games/1/uploads?download_key_id=6",
                    403,
                    "",
                ),
            test_config(),
        );
        let err = lookup(&api, game(1, None), Mode::Paid).unwrap_err();
        assert_eq!(err.message(), "Unable to fetch data from the uploads API.");
    }
}
