use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("state serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}
