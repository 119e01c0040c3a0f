// Configuration: API bases, CDN host and the static credential. Values are
// layered defaults < config.toml < environment < command line.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_BASE: &str = "https://itch.io/api/1";
pub const DEFAULT_GAMES_API_BASE: &str = "https://api.itch.io";
pub const DEFAULT_CDN_HOST: &str = "w3g3a5v6.ssl.hwcdn.net";

/// API key used both as a path segment (v1 API) and as the Authorization
/// header value (games API). Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Credential(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Shape of `config.toml`. Every field is optional.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub games_api_base: Option<String>,
    pub cdn_host: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credential: Credential,
    pub api_base: String,
    pub games_api_base: String,
    pub cdn_host: String,
}

impl Config {
    /// Build a config with the default endpoints.
    pub fn with_credential(credential: Credential) -> Self {
        Config {
            credential,
            api_base: DEFAULT_API_BASE.to_string(),
            games_api_base: DEFAULT_GAMES_API_BASE.to_string(),
            cdn_host: DEFAULT_CDN_HOST.to_string(),
        }
    }

    /// Load from the user config file and the environment, then apply the
    /// command line key if one was given.
    pub fn load(cli_api_key: Option<String>) -> Result<Self> {
        let file = match config_path() {
            Some(path) => read_file_config(&path)?,
            None => FileConfig::default(),
        };
        let env = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self::merge(
            file,
            env("ITCH_API_KEY"),
            env("ITCH_API_BASE"),
            env("ITCH_GAMES_API_BASE"),
            cli_api_key,
        )
    }

    fn merge(
        file: FileConfig,
        env_key: Option<String>,
        env_api_base: Option<String>,
        env_games_api_base: Option<String>,
        cli_key: Option<String>,
    ) -> Result<Self> {
        let key = cli_key.or(env_key).or(file.api_key).context(
            "No itch.io API key configured: pass --api-key, set ITCH_API_KEY, \
             or add api_key to config.toml",
        )?;

        let mut cfg = Config::with_credential(Credential::new(key));
        if let Some(base) = env_api_base.or(file.api_base) {
            cfg.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(base) = env_games_api_base.or(file.games_api_base) {
            cfg.games_api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(host) = file.cdn_host {
            cfg.cdn_host = host;
        }
        Ok(cfg)
    }
}

/// `~/.config/itch-meta/config.toml` on Linux, the platform equivalent elsewhere.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("itch-meta").join("config.toml"))
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg: FileConfig =
        toml::from_str(&data).with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_key_wins_over_env_and_file() {
        let file = FileConfig {
            api_key: Some("from-file".into()),
            ..Default::default()
        };
        let cfg = Config::merge(
            file,
            Some("from-env".into()),
            None,
            None,
            Some("from-cli".into()),
        )
        .unwrap();
        assert_eq!(cfg.credential.expose(), "from-cli");
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
        assert_eq!(cfg.cdn_host, DEFAULT_CDN_HOST);
    }

    #[test]
    fn file_values_fill_in_and_trailing_slash_is_trimmed() {
        let file: FileConfig = toml::from_str(
            r#"
            api_key = "abc"
            api_base = "http://localhost:9000/api/1/"
            cdn_host = "cdn.example"
            "#,
        )
        .unwrap();
        let cfg = Config::merge(file, None, None, None, None).unwrap();
        assert_eq!(cfg.credential.expose(), "abc");
        assert_eq!(cfg.api_base, "http://localhost:9000/api/1");
        assert_eq!(cfg.games_api_base, DEFAULT_GAMES_API_BASE);
        assert_eq!(cfg.cdn_host, "cdn.example");
    }

    #[test]
    fn missing_key_is_an_error() {
        let err = Config::merge(FileConfig::default(), None, None, None, None).unwrap_err();
        assert!(err.to_string().contains("ITCH_API_KEY"));
    }

    #[test]
    fn credential_debug_is_redacted() {
        let cred = Credential::new("secret-key");
        assert_eq!(format!("{:?}", cred), "Credential(***)");
    }
}
