use thiserror::Error;

/// Failures while fetching page markup. These never reach resolver
/// callers; they only make the pipeline move on to its next strategy.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("response is not html: {0}")]
    NotHtml(String),
    #[error("relay response missing body")]
    EmptyRelay,
}
