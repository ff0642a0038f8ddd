//! Session Sweep Task
//!
//! Background task that periodically expires cache entries left untouched
//! longer than the session timeout, independent of capacity pressure. This
//! bounds memory held for abandoned viewing sessions.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::config::CacheConfig;

/// Spawns the background session sweep.
///
/// Each cycle re-reads the sweep interval and session timeout from the
/// shared config, so `update_config` takes effect without restarting the
/// task. The sweep serializes with gets/sets through the store's write lock.
///
/// # Returns
/// A JoinHandle for the spawned task; the engine aborts it on dispose.
pub fn spawn_sweep_task(
    store: Arc<RwLock<CacheStore>>,
    config: Arc<RwLock<CacheConfig>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting session sweep task");

        loop {
            let (interval_ms, timeout_ms) = {
                let config = config.read().await;
                (config.sweep_interval_ms, config.session_timeout_ms)
            };

            tokio::time::sleep(Duration::from_millis(interval_ms)).await;

            let removed = {
                let mut store = store.write().await;
                store.expire_stale(Duration::from_millis(timeout_ms))
            };

            if removed > 0 {
                info!(removed, "session sweep expired stale slices");
            } else {
                debug!("session sweep found no stale slices");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn shared_store() -> Arc<RwLock<CacheStore>> {
        Arc::new(RwLock::new(CacheStore::new(1024 * 1024, 100)))
    }

    fn shared_config(sweep_interval_ms: u64, session_timeout_ms: u64) -> Arc<RwLock<CacheConfig>> {
        Arc::new(RwLock::new(CacheConfig {
            sweep_interval_ms,
            session_timeout_ms,
            ..CacheConfig::default()
        }))
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_expires_stale_entries() {
        let store = shared_store();
        let config = shared_config(1_000, 5_000);

        {
            let mut store = store.write().await;
            store.set("stale".to_string(), Bytes::from_static(b"x"), 1, false);
        }

        let handle = spawn_sweep_task(store.clone(), config);

        // Past the session timeout plus one sweep cycle
        tokio::time::sleep(Duration::from_millis(7_000)).await;

        {
            let store = store.read().await;
            assert!(!store.contains("stale"), "stale entry should be swept");
        }

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_preserves_active_entries() {
        let store = shared_store();
        let config = shared_config(1_000, 60_000);

        {
            let mut store = store.write().await;
            store.set("active".to_string(), Bytes::from_static(b"x"), 1, false);
        }

        let handle = spawn_sweep_task(store.clone(), config);

        // Several sweep cycles, all well inside the session timeout
        tokio::time::sleep(Duration::from_millis(5_000)).await;

        {
            let store = store.read().await;
            assert!(store.contains("active"), "active entry must survive sweeps");
        }

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_expires_regardless_of_capacity() {
        // A near-empty cache still sweeps; expiry is not tied to pressure
        let store = shared_store();
        let config = shared_config(500, 1_000);

        {
            let mut store = store.write().await;
            store.set("only".to_string(), Bytes::from_static(b"x"), 1, false);
        }

        let handle = spawn_sweep_task(store.clone(), config);
        tokio::time::sleep(Duration::from_millis(2_500)).await;

        {
            let store = store.read().await;
            assert!(store.is_empty());
            assert_eq!(store.stats().expirations, 1);
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let store = shared_store();
        let config = shared_config(1_000, 60_000);

        let handle = spawn_sweep_task(store, config);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
