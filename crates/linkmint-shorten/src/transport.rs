use crate::error::TransportError;
use crate::provider::{ProviderRequest, RequestMethod};
use async_trait::async_trait;
use reqwest::header::ACCEPT;

/// Executes provider requests and returns the raw response body.
///
/// Kept behind a trait so pipeline behavior (ordering, timeouts, fallback)
/// is testable with canned transports instead of live provider calls.
#[async_trait]
pub trait ProviderTransport: Send + Sync + 'static {
    async fn execute(&self, request: &ProviderRequest) -> Result<String, TransportError>;
}

/// The real transport, backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

#[async_trait]
impl ProviderTransport for HttpTransport {
    async fn execute(&self, request: &ProviderRequest) -> Result<String, TransportError> {
        let builder = match request.method {
            RequestMethod::Get => self.client.get(&request.endpoint),
            RequestMethod::PostForm => self.client.post(&request.endpoint).form(&request.form),
        };

        let response = builder
            .header(ACCEPT, "text/plain")
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))
    }
}
