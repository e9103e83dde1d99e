//! Cache Statistics Module
//!
//! Diagnostics snapshot of the cache: what it holds and how it has performed.

use serde::Serialize;

// == Cache Stats ==
/// Cache contents and performance counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Current number of entries in the cache
    pub size: usize,
    /// Keys currently held, sorted
    pub keys: Vec<String>,
    /// Number of lookups that returned a live value
    pub hits: u64,
    /// Number of lookups that found nothing or a stale entry
    pub misses: u64,
    /// Number of entries evicted to stay under capacity
    pub evictions: u64,
    /// Number of stale entries removed, lazily or by a sweep
    pub expirations: u64,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn compute_hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    // == Snapshot ==
    /// Fills in the contents fields and derived hit rate for reporting.
    pub fn snapshot(&self, mut keys: Vec<String>) -> Self {
        keys.sort();
        Self {
            size: keys.len(),
            keys,
            hit_rate: self.compute_hit_rate(),
            ..self.clone()
        }
    }
}
