use crate::error::TransportError;
use std::time::Duration;
use tracing::debug;

/// Follows a short link's redirect chain and returns the final URL.
///
/// Uses a HEAD request; the default `reqwest` redirect policy does the
/// actual following. Errors are returned (not swallowed) because expansion
/// has no meaningful fallback.
pub async fn expand(client: &reqwest::Client, short_url: &str) -> Result<String, TransportError> {
    let response = client
        .head(short_url)
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .map_err(|e| TransportError::Request(e.to_string()))?;

    let final_url = response.url().to_string();
    debug!(short_url = %short_url, final_url = %final_url, "expanded short url");
    Ok(final_url)
}
