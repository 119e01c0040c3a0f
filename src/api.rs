// API client module: a small blocking HTTP client for the itch.io endpoints
// this tool needs. The raw GET sits behind the `Transport` trait so the
// lookup flow can be exercised without a network.

use crate::config::{Config, Credential};
use crate::error::LookupError;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status code plus body, all the lookup flow needs from a response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).context("Parsing response json")
    }
}

/// Perform a GET, optionally with an `Authorization` header value.
pub trait Transport {
    fn get(&self, url: &str, authorization: Option<&str>) -> Result<HttpResponse>;
}

/// `Transport` backed by a reqwest blocking client with default timeouts.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("itch-meta/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, authorization: Option<&str>) -> Result<HttpResponse> {
        let mut req = self.client.get(url);
        if let Some(value) = authorization {
            let mut value =
                HeaderValue::from_str(value).context("API key is not a valid header value")?;
            value.set_sensitive(true);
            req = req.header(AUTHORIZATION, value);
        }
        let res = req.send().context("Failed to send request")?;
        let status = res.status().as_u16();
        let body = res.text().context("Failed to read response body")?;
        Ok(HttpResponse { status, body })
    }
}

/// One distributable file, kept exactly as the API sent it: key order,
/// nulls and quoted ids all survive into the copied JSON. The accessors read
/// the few fields this tool looks at and never fail on odd types.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct UploadRecord {
    raw: Map<String, Value>,
}

impl UploadRecord {
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    pub fn id(&self) -> Option<u64> {
        self.raw.get("id").and_then(value_id)
    }

    pub fn game_id(&self) -> Option<u64> {
        self.raw.get("game_id").and_then(value_id)
    }

    pub fn filename(&self) -> Option<&str> {
        self.text("filename")
    }

    pub fn display_name(&self) -> Option<&str> {
        self.text("display_name")
    }

    pub fn size(&self) -> Option<u64> {
        self.raw.get("size").and_then(Value::as_u64)
    }

    pub fn storage(&self) -> Option<&str> {
        self.text("storage")
    }

    /// The upload's `type` field (`default`, `soundtrack`, ...).
    pub fn kind(&self) -> Option<&str> {
        self.text("type")
    }

    pub fn created_at(&self) -> Option<&str> {
        self.text("created_at")
    }

    pub fn updated_at(&self) -> Option<&str> {
        self.text("updated_at")
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.raw.get(key).and_then(Value::as_str)
    }

    /// Human label used when the user has to pick between uploads.
    pub fn label(&self) -> String {
        let name = self
            .display_name()
            .or(self.filename())
            .unwrap_or("(unnamed)");
        match self.id() {
            Some(id) => format!("{} [{}]", name, id),
            None => name.to_string(),
        }
    }
}

/// Numeric id, or a quoted numeric id.
fn value_id(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[derive(Deserialize, Debug)]
struct UploadsResponse {
    #[serde(default)]
    uploads: Vec<UploadRecord>,
}

/// Purchase/download key linking the user to a game.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OwnershipKey {
    #[serde(deserialize_with = "id")]
    pub id: u64,
    #[serde(deserialize_with = "id")]
    pub game_id: u64,
}

#[derive(Deserialize, Debug)]
struct OwnedKeysResponse {
    #[serde(default)]
    owned_keys: Vec<OwnershipKey>,
}

/// The per-page `data.json` document.
#[derive(Deserialize, Debug)]
struct PageData {
    #[serde(default, deserialize_with = "opt_id")]
    id: Option<u64>,
}

/// The platform hands out numeric ids, but older documents sometimes quote
/// them. Accept both.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Num(u64),
    Text(String),
}

impl RawId {
    fn into_u64<E: de::Error>(self) -> std::result::Result<u64, E> {
        match self {
            RawId::Num(n) => Ok(n),
            RawId::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid id {:?}", s))),
        }
    }
}

fn id<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u64, D::Error> {
    RawId::deserialize(d)?.into_u64()
}

fn opt_id<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<u64>, D::Error> {
    match Option::<RawId>::deserialize(d)? {
        Some(raw) => raw.into_u64().map(Some),
        None => Ok(None),
    }
}

/// Typed client for the handful of endpoints the tool calls. Holds the
/// configuration (including the credential) and a transport.
pub struct ApiClient<T = HttpTransport> {
    transport: T,
    config: Config,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, config: Config) -> Self {
        ApiClient { transport, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn credential(&self) -> &Credential {
        &self.config.credential
    }

    fn send(
        &self,
        endpoint: &'static str,
        url: &str,
        authorization: Option<&str>,
    ) -> std::result::Result<HttpResponse, LookupError> {
        let shown = redact(url, self.credential());
        let res = self.transport.get(url, authorization).map_err(|e| {
            tracing::warn!(endpoint, url = %shown, "request failed: {:#}", e);
            LookupError::transport(endpoint, &e)
        })?;
        tracing::info!(endpoint, url = %shown, status = res.status, "GET");
        if !res.is_ok() {
            return Err(LookupError::status(endpoint, res.status));
        }
        Ok(res)
    }

    fn parse<R: DeserializeOwned>(
        endpoint: &'static str,
        res: &HttpResponse,
    ) -> std::result::Result<R, LookupError> {
        res.json().map_err(|e| LookupError::transport(endpoint, &e))
    }

    /// GET `<page_url>/data.json` and read its `id`. Any failure yields `None`.
    pub fn page_game_id(&self, page_url: &str) -> Option<u64> {
        let url = format!("{}/data.json", page_url.trim_end_matches('/'));
        let res = self.send("data.json", &url, None).ok()?;
        match res.json::<PageData>() {
            Ok(data) => data.id,
            Err(e) => {
                tracing::warn!(url = %url, "unreadable data.json: {:#}", e);
                None
            }
        }
    }

    /// Uploads visible with the API key alone (free games).
    pub fn game_uploads(&self, game_id: u64) -> std::result::Result<Vec<UploadRecord>, LookupError> {
        let url = format!(
            "{}/{}/game/{}/uploads",
            self.config.api_base,
            self.credential().expose(),
            game_id
        );
        let res = self.send("game uploads", &url, None)?;
        let data: UploadsResponse = Self::parse("game uploads", &res)?;
        Ok(data.uploads)
    }

    /// Download keys owned by the account behind the API key.
    pub fn owned_keys(&self) -> std::result::Result<Vec<OwnershipKey>, LookupError> {
        let url = format!(
            "{}/{}/my-owned-keys",
            self.config.api_base,
            self.credential().expose()
        );
        let res = self.send("owned keys", &url, None)?;
        let data: OwnedKeysResponse = Self::parse("owned keys", &res)?;
        Ok(data.owned_keys)
    }

    /// Uploads of a paid game, unlocked by one of the user's download keys.
    pub fn key_uploads(
        &self,
        game_id: u64,
        key_id: u64,
    ) -> std::result::Result<Vec<UploadRecord>, LookupError> {
        let url = format!(
            "{}/games/{}/uploads?download_key_id={}",
            self.config.games_api_base, game_id, key_id
        );
        let res = self.send("uploads", &url, Some(self.credential().expose()))?;
        let data: UploadsResponse = Self::parse("uploads", &res)?;
        Ok(data.uploads)
    }
}

/// Replace the credential in a URL before it reaches a log line.
fn redact(url: &str, credential: &Credential) -> String {
    let key = credential.expose();
    if key.is_empty() {
        return url.to_string();
    }
    url.replace(key, "***")
}

/// Pretty JSON with a four-space indent, the format copied to the clipboard.
pub fn to_pretty_json<S: Serialize>(value: &S) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .context("Serializing upload metadata")?;
    String::from_utf8(buf).context("Serialized JSON was not UTF-8")
}
