//! Persisted history of past shortenings.
//!
//! An append-at-front, size-bounded list of [`linkmint_core::HistoryEntry`]
//! values plus a click-count map, deduplicated by original URL. All
//! mutations are read-modify-write cycles serialized through one mutex and
//! persisted atomically per call through a [`StateStore`] backend.

pub mod error;
pub mod history;
pub mod store;

pub use error::StoreError;
pub use history::{HistoryStore, HISTORY_CAPACITY};
pub use store::{JsonFileStore, MemoryStateStore, PersistedState, StateStore};
