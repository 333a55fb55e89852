//! TTL Cleanup Task
//!
//! Background task that periodically drops expired maps from the
//! in-process cache store.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically removes expired maps.
///
/// Expired maps are already invisible to readers; this only reclaims their
/// memory when nothing touches them again.
///
/// # Arguments
/// * `store` - Shared store of the in-memory backend
/// * `interval` - Time between cleanup runs
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let backend = InMemoryBackend::new();
/// let cleanup_handle = spawn_cleanup_task(backend.store(), Duration::from_secs(1));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(store: Arc<RwLock<CacheStore>>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting TTL cleanup task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.write().await.cleanup_expired();

            if removed > 0 {
                info!("TTL cleanup: removed {} expired maps", removed);
            } else {
                debug!("TTL cleanup: no expired maps found");
            }
        }
    })
}
