//! Cache Cleanup Task
//!
//! Background task that periodically sweeps expired responses out of the
//! cache, so keys that are never read again do not pile up.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a task that calls `cleanup()` on the cache every `interval`.
///
/// The first sweep happens one full interval after spawning. The returned
/// handle is aborted on shutdown.
///
/// # Example
/// ```ignore
/// let client = ApiClient::from_config(&config)?;
/// let cleanup_handle = spawn_cleanup_task(client.cache(), Duration::from_secs(60));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: Arc<RwLock<CacheStore>>, interval: Duration) -> JoinHandle<()> {
    // tokio intervals panic on a zero period
    let interval = interval.max(Duration::from_millis(1));

    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "starting cache cleanup task");

        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let (removed, remaining) = {
                let mut cache_guard = cache.write().await;
                let removed = cache_guard.cleanup();
                (removed, cache_guard.len())
            };

            if removed > 0 {
                info!(removed, remaining, "cache cleanup removed expired responses");
            } else {
                debug!(remaining, "cache cleanup found nothing expired");
            }
        }
    })
}
