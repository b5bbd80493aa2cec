use crate::error::Result;
use crate::store::{PersistedState, StateStore};
use jiff::Timestamp;
use linkmint_core::{Clock, HistoryEntry, PageMetadata};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Maximum number of history entries kept; older ones are evicted from
/// the tail.
pub const HISTORY_CAPACITY: usize = 50;

/// The history of past shortenings.
///
/// Mutations are read-modify-write cycles over a cloned state, serialized
/// through one async mutex so overlapping calls can't interleave their
/// reads and writes. The clone is persisted first and only committed to
/// memory when the backend accepted it; a failed write therefore leaves
/// the in-memory state exactly as it was, ready for a retry.
pub struct HistoryStore<S> {
    state: Mutex<PersistedState>,
    backend: Arc<S>,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl<S: StateStore> HistoryStore<S> {
    /// Opens the history, loading whatever the backend has.
    pub async fn open(backend: S, clock: Arc<dyn Clock>) -> Result<Self> {
        Self::open_with_capacity(backend, clock, HISTORY_CAPACITY).await
    }

    pub async fn open_with_capacity(
        backend: S,
        clock: Arc<dyn Clock>,
        capacity: usize,
    ) -> Result<Self> {
        let state = backend.load().await?.unwrap_or_default();
        debug!(entries = state.entries.len(), "history loaded");
        Ok(Self {
            state: Mutex::new(state),
            backend: Arc::new(backend),
            capacity,
            clock,
        })
    }

    /// Records a shortening event.
    ///
    /// Dedup key is the original URL: a repeat shorten refreshes the
    /// existing entry (metadata, short link, timestamp), increments its
    /// counter, and moves it to the front; a new URL is prepended with a
    /// counter of 1. The list is then capped, evicting tail entries and
    /// their click counters.
    pub async fn record_shorten(
        &self,
        original_url: &str,
        short_url: &str,
        metadata: &PageMetadata,
    ) -> Result<HistoryEntry> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let now = self.clock.now();

        let entry = match next
            .entries
            .iter()
            .position(|e| e.original_url == original_url)
        {
            Some(index) => {
                let mut entry = next.entries.remove(index);
                // The short link may have changed provider on re-shorten;
                // its old counter key goes with it.
                if entry.short_url != short_url {
                    next.click_counts.remove(&entry.short_url);
                }
                entry.refresh(short_url, metadata, now);
                entry
            }
            None => HistoryEntry::new(original_url, short_url, metadata, now),
        };

        next.click_counts
            .insert(entry.short_url.clone(), entry.click_count);
        next.entries.insert(0, entry.clone());
        Self::enforce_capacity(&mut next, self.capacity);

        self.commit(&mut state, next).await?;
        Ok(entry)
    }

    /// Bumps the counter for a short link that was opened again and moves
    /// its entry to the front. Unknown short links are ignored.
    pub async fn track_click(&self, short_url: &str) -> Result<Option<u32>> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();

        let Some(index) = next.entries.iter().position(|e| e.short_url == short_url) else {
            return Ok(None);
        };

        let mut entry = next.entries.remove(index);
        entry.click_count += 1;
        let count = entry.click_count;
        next.click_counts.insert(short_url.to_string(), count);
        next.entries.insert(0, entry);

        self.commit(&mut state, next).await?;
        Ok(Some(count))
    }

    /// Most-recent-first snapshot of the history.
    pub async fn list(&self) -> Vec<HistoryEntry> {
        self.state.lock().await.entries.clone()
    }

    /// Removes the entry matching both short URL and timestamp; the pair
    /// disambiguates re-shortened duplicates. Returns whether anything
    /// was removed.
    pub async fn delete(&self, short_url: &str, timestamp: Timestamp) -> Result<bool> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();

        let before = next.entries.len();
        next.entries
            .retain(|e| !(e.short_url == short_url && e.timestamp == timestamp));
        if next.entries.len() == before {
            return Ok(false);
        }

        if !next.entries.iter().any(|e| e.short_url == short_url) {
            next.click_counts.remove(short_url);
        }

        self.commit(&mut state, next).await?;
        Ok(true)
    }

    /// Empties the history and resets all counters.
    pub async fn clear(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        self.commit(&mut state, PersistedState::default()).await
    }

    fn enforce_capacity(state: &mut PersistedState, capacity: usize) {
        if state.entries.len() <= capacity {
            return;
        }
        let evicted = state.entries.split_off(capacity);
        for gone in &evicted {
            if !state.entries.iter().any(|e| e.short_url == gone.short_url) {
                state.click_counts.remove(&gone.short_url);
            }
        }
        debug!(evicted = evicted.len(), "history capacity enforced");
    }

    /// Persists `next` and, only on success, makes it the current state.
    async fn commit(&self, current: &mut PersistedState, next: PersistedState) -> Result<()> {
        if let Err(e) = self.backend.save(&next).await {
            warn!(error = %e, "history persistence failed, in-memory state unchanged");
            return Err(e);
        }
        *current = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::MemoryStateStore;
    use async_trait::async_trait;
    use linkmint_core::ManualClock;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn meta(title: &str) -> PageMetadata {
        PageMetadata {
            title: title.to_string(),
            favicon: "https://example.com/favicon.ico".to_string(),
            ..Default::default()
        }
    }

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(Timestamp::UNIX_EPOCH))
    }

    async fn open_store() -> HistoryStore<MemoryStateStore> {
        HistoryStore::open(MemoryStateStore::new(), clock())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn first_shorten_creates_entry_with_count_one() {
        let store = open_store().await;
        let entry = store
            .record_shorten("https://example.com", "https://is.gd/a", &meta("Example"))
            .await
            .unwrap();

        assert_eq!(entry.click_count, 1);
        assert_eq!(store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn repeat_shorten_dedups_and_increments() {
        let store = open_store().await;
        store
            .record_shorten("https://example.com", "https://is.gd/a", &meta("Old"))
            .await
            .unwrap();
        store
            .record_shorten("https://other.example", "https://is.gd/b", &meta("Other"))
            .await
            .unwrap();
        store
            .record_shorten("https://example.com", "https://is.gd/c", &meta("New"))
            .await
            .unwrap();

        let entries = store.list().await;
        assert_eq!(entries.len(), 2);
        // Back at the front, counted twice, metadata refreshed.
        assert_eq!(entries[0].original_url, "https://example.com");
        assert_eq!(entries[0].click_count, 2);
        assert_eq!(entries[0].title, "New");
        assert_eq!(entries[0].short_url, "https://is.gd/c");
    }

    #[tokio::test]
    async fn capacity_evicts_the_oldest() {
        let clock = clock();
        let store = HistoryStore::open(MemoryStateStore::new(), clock.clone())
            .await
            .unwrap();

        for i in 0..51 {
            store
                .record_shorten(
                    &format!("https://example.com/{}", i),
                    &format!("https://is.gd/{}", i),
                    &meta(&format!("p{}", i)),
                )
                .await
                .unwrap();
            clock.advance(jiff::SignedDuration::from_secs(1));
        }

        let entries = store.list().await;
        assert_eq!(entries.len(), 50);
        assert!(!entries
            .iter()
            .any(|e| e.original_url == "https://example.com/0"));
        assert_eq!(entries[0].original_url, "https://example.com/50");
    }

    #[tokio::test]
    async fn eviction_drops_auxiliary_counters() {
        let store = HistoryStore::open_with_capacity(MemoryStateStore::new(), clock(), 2)
            .await
            .unwrap();

        for i in 0..3 {
            store
                .record_shorten(
                    &format!("https://example.com/{}", i),
                    &format!("https://is.gd/{}", i),
                    &meta("x"),
                )
                .await
                .unwrap();
        }

        let persisted = store.backend.load().await.unwrap().unwrap();
        assert_eq!(persisted.entries.len(), 2);
        assert!(!persisted.click_counts.contains_key("https://is.gd/0"));
        assert!(persisted.click_counts.contains_key("https://is.gd/2"));
    }

    #[tokio::test]
    async fn track_click_bumps_and_reorders() {
        let store = open_store().await;
        store
            .record_shorten("https://a.example", "https://is.gd/a", &meta("A"))
            .await
            .unwrap();
        store
            .record_shorten("https://b.example", "https://is.gd/b", &meta("B"))
            .await
            .unwrap();

        let count = store.track_click("https://is.gd/a").await.unwrap();
        assert_eq!(count, Some(2));

        let entries = store.list().await;
        assert_eq!(entries[0].short_url, "https://is.gd/a");
        assert_eq!(entries[0].click_count, 2);
    }

    #[tokio::test]
    async fn track_click_ignores_unknown_links() {
        let store = open_store().await;
        assert_eq!(store.track_click("https://is.gd/none").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_requires_matching_timestamp() {
        let store = open_store().await;
        let entry = store
            .record_shorten("https://example.com", "https://is.gd/a", &meta("X"))
            .await
            .unwrap();

        let wrong_time = entry.timestamp + jiff::SignedDuration::from_secs(5);
        assert!(!store.delete("https://is.gd/a", wrong_time).await.unwrap());
        assert!(store.delete("https://is.gd/a", entry.timestamp).await.unwrap());
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn clear_resets_everything() {
        let store = open_store().await;
        store
            .record_shorten("https://example.com", "https://is.gd/a", &meta("X"))
            .await
            .unwrap();

        store.clear().await.unwrap();
        assert!(store.list().await.is_empty());

        let persisted = store.backend.load().await.unwrap().unwrap();
        assert!(persisted.entries.is_empty());
        assert!(persisted.click_counts.is_empty());
    }

    /// Backend that can be switched into a failing mode.
    #[derive(Default)]
    struct FlakyStore {
        failing: AtomicBool,
        inner: MemoryStateStore,
    }

    #[async_trait]
    impl StateStore for FlakyStore {
        async fn load(&self) -> crate::error::Result<Option<PersistedState>> {
            self.inner.load().await
        }

        async fn save(&self, state: &PersistedState) -> crate::error::Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StoreError::Io(std::io::Error::other("disk on fire")));
            }
            self.inner.save(state).await
        }
    }

    #[tokio::test]
    async fn failed_persistence_leaves_memory_unchanged() {
        let store = HistoryStore::open(FlakyStore::default(), clock())
            .await
            .unwrap();
        store
            .record_shorten("https://example.com", "https://is.gd/a", &meta("Kept"))
            .await
            .unwrap();

        store.backend.failing.store(true, Ordering::SeqCst);
        let err = store
            .record_shorten("https://other.example", "https://is.gd/b", &meta("Lost"))
            .await;
        assert!(err.is_err());

        // The failed mutation is fully rolled back.
        let entries = store.list().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Kept");

        // Retry succeeds once the backend recovers.
        store.backend.failing.store(false, Ordering::SeqCst);
        store
            .record_shorten("https://other.example", "https://is.gd/b", &meta("Later"))
            .await
            .unwrap();
        assert_eq!(store.list().await.len(), 2);
    }

    #[tokio::test]
    async fn overlapping_mutations_do_not_lose_updates() {
        let store = Arc::new(open_store().await);
        let mut handles = Vec::new();

        for i in 0..10 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .record_shorten(
                        &format!("https://example.com/{}", i),
                        &format!("https://is.gd/{}", i),
                        &meta("x"),
                    )
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.list().await.len(), 10);
    }
}
