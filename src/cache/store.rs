//! Cache Store Module
//!
//! TTL key/value store for API responses, bounded by an LRU capacity.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, Clock, LruTracker, SystemClock, DEFAULT_TTL};

// == Cache Store ==
/// In-memory response cache with per-entry TTL and LRU eviction.
///
/// None of the operations can fail: a missing or stale key is reported as
/// `None`, and a full store makes room by evicting its least recently used
/// entry.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance counters
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// TTL used when `set` is called without one
    default_ttl: Duration,
    /// Time source
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store reading the system clock.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries the cache can hold (at least 1)
    /// * `default_ttl` - TTL for entries stored without an explicit one
    pub fn new(max_entries: usize, default_ttl: Duration) -> Self {
        Self::with_clock(max_entries, default_ttl, Arc::new(SystemClock))
    }

    /// Creates a store reading time from `clock`.
    pub fn with_clock(max_entries: usize, default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries: max_entries.max(1),
            default_ttl,
            clock,
        }
    }

    // == Set ==
    /// Stores a value, replacing any existing entry and resetting its TTL.
    ///
    /// Inserting a new key into a full store first sweeps expired entries,
    /// and evicts the least recently used live entry only if that frees no
    /// room. Overwrites never evict.
    ///
    /// # Arguments
    /// * `key` - The cache key
    /// * `value` - The response payload
    /// * `ttl` - Lifetime of the entry (the store default if None)
    pub fn set(&mut self, key: impl Into<String>, value: Value, ttl: Option<Duration>) {
        let key = key.into();

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.cleanup();
            if self.entries.len() >= self.max_entries {
                if let Some(evicted) = self.lru.evict_oldest() {
                    self.entries.remove(&evicted);
                    self.stats.record_eviction();
                    debug!(key = %evicted, "cache evict");
                }
            }
        }

        let now = self.clock.now_ms();
        let entry = CacheEntry::new(value, now, ttl.unwrap_or(self.default_ttl));
        self.entries.insert(key.clone(), entry);
        self.lru.touch(&key);
    }

    // == Get ==
    /// Returns the value for `key` if it is present and not yet expired.
    ///
    /// A stale entry found here is removed and counted as a miss.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        self.get_with(key, |value| Some(value.clone()))
    }

    /// Looks up `key` and converts the live value with `read`.
    ///
    /// The lookup counts as a hit only when `read` accepts the value. An
    /// entry it rejects is removed and the lookup counts as a miss.
    pub fn get_with<T>(&mut self, key: &str, read: impl FnOnce(&Value) -> Option<T>) -> Option<T> {
        let now = self.clock.now_ms();

        let (expired, result) = match self.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => (false, Some(read(&entry.value))),
            Some(_) => (true, None),
            None => (false, None),
        };

        match result {
            Some(Some(value)) => {
                self.stats.record_hit();
                self.lru.touch(key);
                Some(value)
            }
            Some(None) => {
                self.delete(key);
                self.stats.record_miss();
                None
            }
            None => {
                if expired {
                    self.delete(key);
                    self.stats.record_expirations(1);
                }
                self.stats.record_miss();
                None
            }
        }
    }

    // == Delete ==
    /// Removes an entry. Returns whether it was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.lru.remove(key);
        self.entries.remove(key).is_some()
    }

    // == Cleanup ==
    /// Removes every entry whose expiry is at or before now.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.record_expirations(expired.len());
        expired.len()
    }

    // == Clear ==
    /// Drops every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    // == Stats ==
    /// Returns the live keys and the counters.
    ///
    /// Entries past their expiry are left out even before a lookup or sweep
    /// removes them.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now_ms();
        let live = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();
        self.stats.snapshot(live)
    }

    /// Returns the remaining lifetime of a live entry.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.ttl_remaining_at(now))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(crate::cache::DEFAULT_MAX_ENTRIES, DEFAULT_TTL)
    }
}
