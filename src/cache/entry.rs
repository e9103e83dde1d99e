//! Cache Entry Module
//!
//! Defines a single cached API response with its expiry.

use std::time::Duration;

use serde_json::Value;

// == Cache Entry ==
/// A cached response payload and its lifetime.
///
/// Entries are never mutated after creation; an overwrite replaces the
/// whole entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// The stored response, opaque to the cache
    pub value: Value,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry stored at `now_ms` that lives for `ttl`.
    pub fn new(value: Value, now_ms: u64, ttl: Duration) -> Self {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);

        Self {
            value,
            created_at: now_ms,
            expires_at: now_ms.saturating_add(ttl_ms),
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is stale at `now_ms`.
    ///
    /// An entry is expired once the current time reaches its expiration
    /// time, so a TTL of zero is stale immediately.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }

    // == Time To Live ==
    /// Returns the remaining lifetime at `now_ms`, zero once expired.
    pub fn ttl_remaining_at(&self, now_ms: u64) -> Duration {
        Duration::from_millis(self.expires_at.saturating_sub(now_ms))
    }
}
