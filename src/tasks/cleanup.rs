//! Expiry Sweep Task
//!
//! Background task that periodically drops expired cache entries and
//! finished rate-limit windows. Reads already ignore expired entries; this
//! only reclaims their memory early.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CachedResponse, ResponseCache};
use crate::limiter::RateLimiter;

/// Spawns a background task that sweeps the cache and the rate limiter every
/// `interval`.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let handle = spawn_cleanup_task(state.cache.clone(), state.limiter.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_cleanup_task(
    cache: ResponseCache<CachedResponse>,
    limiter: Arc<RateLimiter>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting expiry sweep task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let expired_entries = cache.purge_expired().await;
            let expired_windows = limiter.sweep_expired().await;

            if expired_entries > 0 || expired_windows > 0 {
                info!(
                    expired_entries,
                    expired_windows, "Expiry sweep removed stale state"
                );
            } else {
                debug!("Expiry sweep: nothing to remove");
            }
        }
    })
}
