//! FILENAME: core/dashboard/src/cache.rs
//! Snapshot Cache - Last loaded record set per source, valid for a fixed TTL.

use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Entry<T> {
    stored_at: Instant,
    value: T,
}

#[derive(Debug, Clone)]
pub struct SnapshotCache<T> {
    ttl: Duration,
    entries: HashMap<String, Entry<T>>,
}

impl<T> SnapshotCache<T> {
    pub fn new(ttl: Duration) -> Self {
        SnapshotCache {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn put(&mut self, key: impl Into<String>, value: T) {
        self.put_at(key, value, Instant::now());
    }

    pub fn put_at(&mut self, key: impl Into<String>, value: T, now: Instant) {
        self.entries.insert(key.into(), Entry { stored_at: now, value });
    }

    pub fn get(&mut self, key: &str) -> Option<&T> {
        self.get_at(key, Instant::now())
    }

    /// The entry for `key` if it is younger than the TTL at `now`.
    /// An expired entry is evicted.
    pub fn get_at(&mut self, key: &str, now: Instant) -> Option<&T> {
        let expired = self
            .entries
            .get(key)
            .is_some_and(|e| now.saturating_duration_since(e.stored_at) >= self.ttl);
        if expired {
            log::debug!("[CACHE] snapshot '{}' expired", key);
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|e| &e.value)
    }

    pub fn invalidate(&mut self, key: &str) {
        self.entries.remove(key);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
