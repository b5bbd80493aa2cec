use thiserror::Error;

/// Failures while talking to a shortening provider. These never escape the
/// pipeline; they only decide whether the next provider gets a turn.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("provider returned status {0}")]
    Status(u16),
}
