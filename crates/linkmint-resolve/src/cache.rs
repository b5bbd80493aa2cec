use dashmap::DashMap;
use jiff::Timestamp;
use linkmint_core::{Clock, PageMetadata};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Default time-to-live for cached metadata.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Default capacity before oldest-first eviction kicks in.
pub const DEFAULT_CAPACITY: usize = 200;

#[derive(Debug, Clone)]
struct CacheEntry {
    metadata: PageMetadata,
    cached_at: Timestamp,
}

/// A time-bounded metadata cache keyed by page URL.
///
/// Entries older than the TTL are treated as absent (and dropped on
/// lookup). When an insert pushes the cache past capacity, the entries
/// with the oldest `cached_at` go first.
#[derive(Clone)]
pub struct MetadataCache {
    entries: Arc<DashMap<String, CacheEntry>>,
    ttl: Duration,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl MetadataCache {
    pub fn new(ttl: Duration, capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
            capacity,
            clock,
        }
    }

    pub fn with_defaults(clock: Arc<dyn Clock>) -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY, clock)
    }

    /// Returns the cached record for `url`, unless it has expired.
    pub fn get(&self, url: &str) -> Option<PageMetadata> {
        let entry = self.entries.get(url)?;

        let age = self.clock.now().duration_since(entry.cached_at);
        if age.as_secs_f64() >= self.ttl.as_secs_f64() {
            drop(entry);
            self.entries.remove(url);
            trace!(url = %url, "cache entry expired");
            return None;
        }

        debug!(url = %url, "metadata cache hit");
        Some(entry.metadata.clone())
    }

    /// Stores a record under `url` with the current timestamp, evicting
    /// the oldest entries if the cache is over capacity.
    pub fn insert(&self, url: impl Into<String>, metadata: PageMetadata) {
        let url = url.into();
        self.entries.insert(
            url.clone(),
            CacheEntry {
                metadata,
                cached_at: self.clock.now(),
            },
        );
        trace!(url = %url, "metadata cached");

        if self.entries.len() > self.capacity {
            self.evict_oldest(self.entries.len() - self.capacity);
        }
    }

    fn evict_oldest(&self, count: usize) {
        let mut by_age: Vec<(String, Timestamp)> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().cached_at))
            .collect();
        by_age.sort_by_key(|(_, cached_at)| *cached_at);

        for (key, _) in by_age.into_iter().take(count) {
            self.entries.remove(&key);
        }
        debug!(evicted = count, remaining = self.entries.len(), "cache eviction");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
