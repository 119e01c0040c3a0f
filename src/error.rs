// Error kinds surfaced to the user. Each one maps to a dialog title and a
// short message; nothing here is allowed to crash the front end.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    /// Any non-200 response, or a request that never got a response.
    #[error("{endpoint} request failed: {reason}")]
    Api { endpoint: &'static str, reason: String },

    #[error("game {game_id} is not owned by the user")]
    NotOwned { game_id: u64 },

    #[error("no upload with id {version_id} for game {game_id}")]
    VersionNotFound { game_id: u64, version_id: u64 },

    #[error("could not resolve a game id from {url}")]
    Unresolved { url: String },
}

impl LookupError {
    pub(crate) fn status(endpoint: &'static str, status: u16) -> Self {
        LookupError::Api {
            endpoint,
            reason: format!("HTTP {}", status),
        }
    }

    pub(crate) fn transport(endpoint: &'static str, err: &anyhow::Error) -> Self {
        LookupError::Api {
            endpoint,
            reason: format!("{:#}", err),
        }
    }

    /// Title of the acknowledgment dialog for this error.
    pub fn title(&self) -> &'static str {
        match self {
            LookupError::Api { .. } => "API Error",
            LookupError::NotOwned { .. } => "Game Not Owned",
            LookupError::VersionNotFound { .. } => "Upload Not Found",
            LookupError::Unresolved { .. } => "Invalid URL",
        }
    }

    /// Body of the acknowledgment dialog for this error.
    pub fn message(&self) -> String {
        match self {
            LookupError::Api { endpoint: "uploads", .. } => {
                "Unable to fetch data from the uploads API.".to_string()
            }
            LookupError::Api { .. } => "Unable to fetch data from the API.".to_string(),
            LookupError::NotOwned { .. } => {
                "The specified game ID is not owned by the user.".to_string()
            }
            LookupError::VersionNotFound { version_id, .. } => {
                format!("No upload with id {} was found for this game.", version_id)
            }
            LookupError::Unresolved { .. } => {
                "Could not find a game ID for that URL.".to_string()
            }
        }
    }
}
