//! Expiry Sweep Task
//!
//! Redis expires keys itself. The in-process backend only drops expired
//! sessions when they are read, so this task sweeps the rest periodically.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryCache;

/// Spawns a task that removes expired sessions from `cache` every
/// `interval_secs` seconds.
///
/// # Returns
/// A JoinHandle that can be aborted during graceful shutdown.
pub fn spawn_cleanup_task(cache: MemoryCache, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "Starting session expiry sweep");

        loop {
            tokio::time::sleep(interval).await;

            if cache.is_closed() {
                info!("Cache closed, stopping expiry sweep");
                break;
            }

            let removed = cache.cleanup_expired().await;
            if removed > 0 {
                info!(removed, "Expiry sweep removed expired sessions");
            } else {
                debug!("Expiry sweep found nothing to remove");
            }
        }
    })
}
