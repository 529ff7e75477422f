//! Authenticated JSON request layer over the GitHub REST API

use crate::config::SquashConfig;
use crate::error::{Error, Result};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Public GitHub API mount point
pub const PUBLIC_API_BASE: &str = "https://api.github.com";

/// Media type sent with every request
const ACCEPT: &str = "application/vnd.github.v3+json";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// One authenticated request at a time against the GitHub API.
///
/// The client never retries; each call maps the response status to either
/// the parsed JSON body or an [`Error`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    token: Option<String>,
    config: SquashConfig,
    /// Web host the PR lives on (None for github.com)
    host: Option<String>,
    /// Fixed API base, bypassing host resolution
    api_base: Option<String>,
}

impl ApiClient {
    /// Create a client for `host` with injected configuration.
    ///
    /// A missing token is not an error here; the first call fails with
    /// [`Error::MissingCredential`] instead.
    pub fn new(config: SquashConfig, token: Option<String>, host: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("pr-squash/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            token,
            config,
            host,
            api_base: None,
        })
    }

    /// Send every request to `base` instead of the resolved API host.
    #[must_use]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into().trim_end_matches('/').to_string());
        self
    }

    /// Replace the configuration; takes effect on the next call.
    pub fn set_config(&mut self, config: SquashConfig) {
        self.config = config;
    }

    /// API base URL for the next request.
    ///
    /// Enterprise hosts are served from `https://<host>/api/v3`; everything
    /// else goes to the public API.
    pub fn api_base(&self) -> String {
        if let Some(ref base) = self.api_base {
            return base.clone();
        }
        match self.host.as_deref() {
            Some(host) if self.config.is_enterprise_host(host) => {
                format!("https://{}/api/v3", host.to_ascii_lowercase())
            }
            _ => PUBLIC_API_BASE.to_string(),
        }
    }

    /// Perform one request and return the JSON body.
    ///
    /// An empty body yields an empty object. `DELETE` answered with 404 counts
    /// as success since the resource is gone either way.
    pub async fn call(&self, endpoint: &str, method: Method, body: Option<&Value>) -> Result<Value> {
        let token = self.token.as_deref().ok_or(Error::MissingCredential)?;
        let url = format!("{}{}", self.api_base(), endpoint);
        debug!(%method, endpoint, "API call");

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header("Authorization", format!("Bearer {token}"))
            .header("Accept", ACCEPT);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(%method, endpoint, status = status.as_u16(), "API response");

        interpret_response(&method, endpoint, status, &text)
    }

    /// [`call`](Self::call) and deserialize the body into `T`.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<T> {
        let value = self.call(endpoint, method, body).await?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Map a status and body to the call outcome.
pub fn interpret_response(
    method: &Method,
    endpoint: &str,
    status: StatusCode,
    body: &str,
) -> Result<Value> {
    let tolerated = *method == Method::DELETE && status == StatusCode::NOT_FOUND;
    if !status.is_success() && !tolerated {
        return Err(Error::RemoteRejected {
            method: method.to_string(),
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    if tolerated {
        debug!(endpoint, "DELETE target already gone");
        return Ok(Value::Object(serde_json::Map::new()));
    }

    if body.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    Ok(serde_json::from_str(body)?)
}
