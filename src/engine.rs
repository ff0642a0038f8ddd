//! Predictive Cache Engine
//!
//! Orchestrates the pattern analyzer, the bounded store and the background
//! sweep behind the get/set/preload/stats contract the viewer consumes.

use std::future::Future;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::{CacheStats, CacheStore};
use crate::config::{CacheConfig, ConfigUpdate};
use crate::error::Result;
use crate::interaction::{InteractionEvent, PatternAnalyzer, Prediction, DEFAULT_HISTORY_WINDOW};
use crate::tasks::spawn_sweep_task;

// == Key Derivation ==
/// Canonical cache key for a slice: `"{scope}:{index}"`, where the scope
/// identifies the study/series the slice belongs to.
pub fn slice_key(scope: &str, slice_index: i64) -> String {
    format!("{}:{}", scope, slice_index)
}

// == Engine ==
/// The predictive slice cache.
///
/// Multiple independent engines can coexist; all state is instance-owned.
/// Shared pieces live behind `Arc<RwLock<_>>` so the navigation path,
/// speculative preload tasks and the sweep serialize on the same store.
pub struct SliceCacheEngine {
    /// Hot-reloadable configuration
    config: Arc<RwLock<CacheConfig>>,
    /// Bounded payload store; the single critical section for all mutations
    store: Arc<RwLock<CacheStore>>,
    /// Interaction history and pattern statistics
    analyzer: Arc<RwLock<PatternAnalyzer>>,
    /// Background sweep, aborted on dispose
    sweep: Mutex<Option<JoinHandle<()>>>,
}

impl SliceCacheEngine {
    // == Constructors ==
    /// Creates an engine and starts its background sweep.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: CacheConfig) -> Self {
        let store = Arc::new(RwLock::new(CacheStore::new(
            config.max_cache_bytes,
            config.max_items,
        )));
        let config = Arc::new(RwLock::new(config));
        let sweep = spawn_sweep_task(Arc::clone(&store), Arc::clone(&config));

        Self {
            config,
            store,
            analyzer: Arc::new(RwLock::new(PatternAnalyzer::new(DEFAULT_HISTORY_WINDOW))),
            sweep: Mutex::new(Some(sweep)),
        }
    }

    /// Creates an engine with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(CacheConfig::default())
    }

    // == Record Interaction ==
    /// Feeds one navigation event into the recorder/analyzer. No failure
    /// modes; pattern state is consistent with the event once this returns.
    pub async fn record_interaction(&self, event: InteractionEvent) {
        self.analyzer.write().await.record(event);
    }

    // == Load Slice ==
    /// Returns the payload for `key`, from cache when resident, otherwise
    /// through the injected loader.
    ///
    /// Loader-fetched payloads are stored as explicit entries. A loader
    /// failure propagates to the caller and leaves the store untouched.
    pub async fn load_slice<L, Fut>(&self, key: &str, loader: L) -> Result<Bytes>
    where
        L: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<(Bytes, u64)>>,
    {
        if let Some(payload) = self.store.write().await.get(key) {
            return Ok(payload);
        }

        let (payload, size_bytes) = loader(key.to_string()).await?;
        self.store
            .write()
            .await
            .set(key.to_string(), payload.clone(), size_bytes, false);
        Ok(payload)
    }

    // == Predict And Preload ==
    /// Issues fire-and-forget loads for predicted-but-uncached slices.
    ///
    /// Predictions below the confidence threshold never reach the loader.
    /// Successful speculative loads land in the store marked predicted;
    /// failures are logged and swallowed — the user never asked for them.
    /// The returned handles exist so tests can await quiescence; production
    /// callers simply drop them. In-flight loads are not cancelled when the
    /// user navigates on.
    pub async fn predict_and_preload<L, Fut>(
        &self,
        scope: &str,
        current_slice: i64,
        total_slices: i64,
        loader: L,
    ) -> Vec<JoinHandle<()>>
    where
        L: Fn(String) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<(Bytes, u64)>> + Send + 'static,
    {
        let threshold = {
            let config = self.config.read().await;
            config.confidence_threshold
        };
        let predictions = self.predictions(current_slice, total_slices).await;

        let mut handles = Vec::new();
        for prediction in predictions {
            if prediction.confidence < threshold {
                continue;
            }
            let key = slice_key(scope, prediction.slice_index);
            if self.store.read().await.contains(&key) {
                continue;
            }

            let store = Arc::clone(&self.store);
            let loader = loader.clone();
            handles.push(tokio::spawn(async move {
                match loader(key.clone()).await {
                    Ok((payload, size_bytes)) => {
                        store.write().await.set(key, payload, size_bytes, true);
                    }
                    Err(err) => {
                        warn!(key = %key, error = %err, "speculative slice load failed");
                    }
                }
            }));
        }

        debug!(
            scope,
            current_slice,
            issued = handles.len(),
            "speculative preloads issued"
        );
        handles
    }

    // == Predictions ==
    /// Current ranked predictions without issuing any loads.
    pub async fn predictions(&self, current_slice: i64, total_slices: i64) -> Vec<Prediction> {
        let (threshold, window) = {
            let config = self.config.read().await;
            (config.confidence_threshold, config.prediction_window)
        };
        self.analyzer
            .read()
            .await
            .predict_next(current_slice, total_slices, threshold, window)
    }

    // == Store Queries ==
    /// True when `key` is resident. Does not touch recency or stats.
    pub async fn is_cached(&self, key: &str) -> bool {
        self.store.read().await.contains(key)
    }

    /// Resident keys within a scope (empty scope = all keys).
    pub async fn cached_keys(&self, scope: &str) -> Vec<String> {
        self.store.read().await.cached_keys(scope)
    }

    /// Drops every cached slice belonging to `scope`.
    pub async fn clear_scope(&self, scope: &str) {
        self.store.write().await.clear_scope(scope);
    }

    /// Drops every cached slice.
    pub async fn clear_all(&self) {
        self.store.write().await.clear_all();
    }

    /// Statistics snapshot computed from the store's counters.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    // == Update Config ==
    /// Applies a partial configuration update at runtime.
    ///
    /// Capacity changes are pushed into the store immediately, which may
    /// evict on shrink; the sweep picks up new timings on its next cycle.
    pub async fn update_config(&self, update: ConfigUpdate) {
        let (max_bytes, max_items) = {
            let mut config = self.config.write().await;
            config.apply(&update);
            (config.max_cache_bytes, config.max_items)
        };
        self.store.write().await.set_limits(max_bytes, max_items);
    }

    // == Dispose ==
    /// Stops the background sweep and clears the store. Idempotent.
    pub async fn dispose(&self) {
        let handle = self.sweep.lock().expect("sweep handle lock poisoned").take();
        if let Some(handle) = handle {
            handle.abort();
        }
        self.store.write().await.clear_all();
    }
}

impl Drop for SliceCacheEngine {
    fn drop(&mut self) {
        if let Ok(mut sweep) = self.sweep.lock() {
            if let Some(handle) = sweep.take() {
                handle.abort();
            }
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_key_format() {
        assert_eq!(slice_key("ct-chest", 42), "ct-chest:42");
        assert_eq!(slice_key("s", 0), "s:0");
    }

    #[tokio::test]
    async fn test_engines_are_independent() {
        let a = SliceCacheEngine::with_defaults();
        let b = SliceCacheEngine::with_defaults();

        a.load_slice("ct:1", |_| async {
            Ok::<_, crate::error::LoadError>((Bytes::from_static(b"x"), 1))
        })
        .await
        .unwrap();

        assert!(a.is_cached("ct:1").await);
        assert!(!b.is_cached("ct:1").await);

        a.dispose().await;
        b.dispose().await;
    }

    #[tokio::test]
    async fn test_dispose_is_idempotent() {
        let engine = SliceCacheEngine::with_defaults();
        engine.dispose().await;
        engine.dispose().await;
        assert!(engine.cached_keys("").await.is_empty());
    }
}
