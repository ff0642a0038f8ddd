//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, predictive hits,
//! evictions and expirations.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals
    pub misses: u64,
    /// Hits on entries that were populated speculatively
    pub predictive_hits: u64,
    /// Entries removed under capacity pressure
    pub evictions: u64,
    /// Entries removed by the session sweep
    pub expirations: u64,
    /// Current number of cached slices
    pub total_entries: usize,
    /// Current payload bytes held
    pub total_bytes: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Derived Metrics ==
    /// Total retrieval attempts observed.
    pub fn total_requests(&self) -> u64 {
        self.hits + self.misses
    }

    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Share of hits that were served from speculatively loaded entries.
    pub fn predictive_hit_rate(&self) -> f64 {
        if self.hits == 0 {
            0.0
        } else {
            self.predictive_hits as f64 / self.hits as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter, and the predictive-hit counter when the
    /// entry was populated by the predictor.
    pub fn record_hit(&mut self, predicted: bool) {
        self.hits += 1;
        if predicted {
            self.predictive_hits += 1;
        }
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    /// Increments the eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Record Expiration ==
    /// Increments the sweep expiration counter.
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    // == Update Usage ==
    /// Updates the resident entry/byte usage snapshot.
    pub fn set_usage(&mut self, entries: usize, bytes: u64) {
        self.total_entries = entries;
        self.total_bytes = bytes;
    }
}
