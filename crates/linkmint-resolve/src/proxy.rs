use crate::error::FetchError;
use crate::fetch::PageFetcher;
use async_trait::async_trait;
use tracing::debug;
use url::form_urlencoded;

/// How a relay wraps the page it fetched on our behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayStyle {
    /// JSON envelope with the markup under a `contents` field.
    JsonContents,
    /// The markup comes back as the raw response body.
    Raw,
}

/// One CORS-relay endpoint.
#[derive(Debug, Clone)]
pub struct Relay {
    pub name: &'static str,
    /// Prefix the url-encoded target is appended to.
    pub endpoint_prefix: &'static str,
    pub style: RelayStyle,
}

impl Relay {
    fn endpoint_for(&self, target: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(target.as_bytes()).collect();
        format!("{}{}", self.endpoint_prefix, encoded)
    }

    fn unwrap_body(&self, body: String) -> Result<String, FetchError> {
        match self.style {
            RelayStyle::Raw => Ok(body),
            RelayStyle::JsonContents => {
                let value: serde_json::Value = serde_json::from_str(&body)
                    .map_err(|e| FetchError::Request(format!("relay envelope: {}", e)))?;
                value
                    .get("contents")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string())
                    .ok_or(FetchError::EmptyRelay)
            }
        }
    }
}

/// The default relay ladder.
pub fn default_relays() -> Vec<Relay> {
    vec![
        Relay {
            name: "allorigins",
            endpoint_prefix: "https://api.allorigins.win/get?url=",
            style: RelayStyle::JsonContents,
        },
        Relay {
            name: "corsproxy",
            endpoint_prefix: "https://corsproxy.io/?",
            style: RelayStyle::Raw,
        },
    ]
}

/// Fetches page markup through third-party CORS relays, tried in
/// sequence. Useful when the page itself refuses direct fetches.
#[derive(Debug, Clone)]
pub struct ProxyFetcher {
    client: reqwest::Client,
    relays: Vec<Relay>,
}

impl ProxyFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_relays(client, default_relays())
    }

    pub fn with_relays(client: reqwest::Client, relays: Vec<Relay>) -> Self {
        Self { client, relays }
    }

    async fn fetch_via(&self, relay: &Relay, target: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(relay.endpoint_for(target))
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;
        relay.unwrap_body(body)
    }
}

#[async_trait]
impl PageFetcher for ProxyFetcher {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let mut last_error = FetchError::EmptyRelay;
        for relay in &self.relays {
            match self.fetch_via(relay, url).await {
                Ok(body) if !body.trim().is_empty() => {
                    debug!(relay = relay.name, "relay delivered page body");
                    return Ok(body);
                }
                Ok(_) => {
                    debug!(relay = relay.name, "relay returned an empty body");
                    last_error = FetchError::EmptyRelay;
                }
                Err(e) => {
                    debug!(relay = relay.name, error = %e, "relay failed");
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }
}
