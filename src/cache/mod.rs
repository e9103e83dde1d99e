//! Cache Module
//!
//! In-memory response cache with TTL expiration, LRU capacity bound and
//! deterministic request fingerprints.

mod clock;
mod entry;
mod key;
mod lru;
mod stats;
mod store;


use std::time::Duration;

// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use key::{content_hash, content_hash_reader, make_key};
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// TTL for entries stored without an explicit one
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// TTL for image analyses, which are more expensive to recompute
pub const IMAGE_TTL: Duration = Duration::from_secs(30 * 60);

/// Default capacity of the store
pub const DEFAULT_MAX_ENTRIES: usize = 1000;
