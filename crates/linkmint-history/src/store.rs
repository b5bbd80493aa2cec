use crate::error::Result;
use async_trait::async_trait;
use linkmint_core::HistoryEntry;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Everything the history component persists, as one unit. Field names
/// match the key names the data has always been stored under.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(rename = "urlHistory", default)]
    pub entries: Vec<HistoryEntry>,
    /// Auxiliary counters keyed by short URL.
    #[serde(rename = "urlClickCount", default)]
    pub click_counts: HashMap<String, u32>,
}

/// Durable backend for [`PersistedState`].
///
/// `save` must be atomic per call: a failed write may lose the update but
/// must never leave a corrupted or truncated structure behind.
#[async_trait]
pub trait StateStore: Send + Sync + 'static {
    /// Returns the stored state, or `None` if nothing was stored yet.
    async fn load(&self) -> Result<Option<PersistedState>>;

    async fn save(&self, state: &PersistedState) -> Result<()>;
}

/// Volatile backend, mainly for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    inner: Mutex<Option<PersistedState>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load(&self) -> Result<Option<PersistedState>> {
        Ok(self.inner.lock().clone())
    }

    async fn save(&self, state: &PersistedState) -> Result<()> {
        *self.inner.lock() = Some(state.clone());
        Ok(())
    }
}

/// JSON file backend. Writes go to a sibling temp file first and are
/// moved into place with a rename, so a crash mid-write leaves the old
/// state intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn load(&self) -> Result<Option<PersistedState>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let state = serde_json::from_slice(&bytes)?;
        Ok(Some(state))
    }

    async fn save(&self, state: &PersistedState) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(state)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        trace!(path = %self.path.display(), bytes = bytes.len(), "state persisted");
        Ok(())
    }
}
