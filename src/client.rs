use std::time::Duration;

use base64::Engine;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::config::{mask_secret, Credentials};
use crate::error::{FmcsError, Result};
use crate::router::{Method, RemoteCall};

const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u64),
    Text(String),
}

/// Ids and counters arrive as numbers or as numeric strings depending on the
/// server version.
fn flexible_number<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
    match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(n)) => Ok(n),
        Some(NumberOrText::Text(s)) if s.trim().is_empty() => Ok(0),
        Some(NumberOrText::Text(s)) => s.trim().parse().map_err(|_| {
            <D::Error as serde::de::Error>::custom(format!("expected a number, got \"{s}\""))
        }),
        None => Ok(0),
    }
}

fn flexible_id<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u32, D::Error> {
    let n = flexible_number(deserializer)?;
    u32::try_from(n).map_err(serde::de::Error::custom)
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseFile {
    #[serde(deserialize_with = "flexible_id")]
    pub id: u32,
    pub filename: String,
    pub folder: String,
    pub status: String,
    #[serde(deserialize_with = "flexible_number")]
    pub clients: u64,
    #[serde(deserialize_with = "flexible_number")]
    pub size: u64,
    pub enabled_ext_privileges: Vec<String>,
    pub is_encrypted: bool,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuestFile {
    pub filename: String,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectedClient {
    #[serde(deserialize_with = "flexible_id")]
    pub id: u32,
    pub user_name: String,
    pub computer_name: String,
    pub extpriv: String,
    pub ipaddress: String,
    pub mac_address: String,
    pub app_version: String,
    pub connect_time: String,
    pub connect_duration: String,
    pub guest_files: Vec<GuestFile>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Schedule {
    #[serde(deserialize_with = "flexible_id")]
    pub id: u32,
    pub name: String,
    pub task_type: String,
    pub last_run: String,
    pub next_run: String,
    pub status: String,
    pub enabled: bool,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct FileList {
    pub files: Vec<DatabaseFile>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ClientList {
    pub clients: Vec<ConnectedClient>,
}

/// Envelope shared by every Admin API response.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ApiResponse {
    pub result: i64,
    pub token: String,
    #[serde(rename = "totalDBCount")]
    pub total_db_count: i64,
    pub files: FileList,
    pub clients: ClientList,
    pub schedules: Vec<Schedule>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub fn encode_basic_auth(credentials: &Credentials) -> String {
    let pair = format!("{}:{}", credentials.username, credentials.password);
    let encoded = base64::engine::general_purpose::STANDARD.encode(pair.as_bytes());
    format!("Basic {encoded}")
}

pub struct AdminClient {
    host_url: String,
    token: Option<String>,
    client: reqwest::blocking::Client,
}

impl AdminClient {
    /// `host_url` is scheme, host and port; request paths carry the API base.
    pub fn new(host_url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(None::<Duration>)
            .build()?;
        Ok(Self {
            host_url: host_url.trim_end_matches('/').to_string(),
            token: None,
            client,
        })
    }

    pub fn login(&mut self, base_path: &str, credentials: &Credentials) -> Result<()> {
        tracing::debug!(
            user = %credentials.username,
            password = %mask_secret(&credentials.password),
            "logging in"
        );
        let url = format!("{}{base_path}/user/login", self.host_url);
        let resp = self
            .client
            .post(&url)
            .header("Authorization", encode_basic_auth(credentials))
            .json(&Map::new())
            .send()?;
        let payload = Self::decode(resp)?;
        if payload.token.is_empty() {
            return Err(FmcsError::Remote { code: -1 });
        }
        self.token = Some(payload.token);
        Ok(())
    }

    pub fn logout(&mut self, base_path: &str) -> Result<()> {
        let Some(token) = self.token.take() else {
            return Ok(());
        };
        let url = format!("{}{base_path}/user/logout", self.host_url);
        let resp = self.client.post(&url).bearer_auth(&token).json(&Map::new()).send()?;
        Self::decode(resp)?;
        Ok(())
    }

    pub fn send(&self, call: &RemoteCall) -> Result<ApiResponse> {
        tracing::debug!(method = call.method.as_str(), path = %call.path, "request");
        let url = format!("{}{}", self.host_url, call.path);
        let method = match call.method {
            Method::Get => reqwest::Method::GET,
            Method::Put => reqwest::Method::PUT,
        };
        let mut req = self.client.request(method, &url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = &call.body {
            req = req.json(body);
        }
        Self::decode(req.send()?)
    }

    fn decode(resp: reqwest::blocking::Response) -> Result<ApiResponse> {
        let status = resp.status();
        let text = resp.text()?;
        let payload: ApiResponse = match serde_json::from_str(&text) {
            Ok(p) => p,
            Err(e) if status.is_success() => return Err(e.into()),
            Err(_) => {
                tracing::debug!(%status, "non-JSON error response");
                return Err(FmcsError::Remote { code: -1 });
            }
        };
        tracing::debug!(%status, result = payload.result, "response");
        if payload.result == 0 && !status.is_success() {
            return Err(FmcsError::Remote { code: -1 });
        }
        if payload.result != 0 {
            return Err(FmcsError::Remote {
                code: payload.result,
            });
        }
        Ok(payload)
    }
}
