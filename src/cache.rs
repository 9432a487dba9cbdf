use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

struct Entry<V> {
    cached_at: Instant,
    value: Arc<V>,
}

/// Read-through cache with one fixed time-to-live for every entry.
///
/// Entries are keyed by query shape, so distinct lookups coexist, but
/// invalidation is wholesale: any write to the underlying data clears the
/// entire cache rather than chasing the subset of keys it touched. A single
/// mutex guards the map; the loader runs under the lock so a slow load is
/// performed once, not raced.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, Entry<V>>>,
}

impl<K: Eq + Hash, V> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        TtlCache {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key` if it is younger than the TTL,
    /// otherwise runs `loader` and caches its result.
    pub fn get_with(&self, key: K, loader: impl FnOnce() -> V) -> Arc<V> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        if let Some(entry) = entries.get(&key) {
            if now.duration_since(entry.cached_at) < self.ttl {
                return entry.value.clone();
            }
        }
        let value = Arc::new(loader());
        entries.insert(
            key,
            Entry {
                cached_at: now,
                value: value.clone(),
            },
        );
        value
    }

    /// Drops every entry regardless of key or age.
    pub fn invalidate_all(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
