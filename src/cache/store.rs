//! Cache Store Module
//!
//! Byte- and item-bounded slice store with priority+recency eviction.

use std::collections::HashMap;

use bytes::Bytes;
use tokio::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// Bounded key→payload store.
///
/// Both invariants hold after every mutating operation returns:
/// total payload bytes never exceed `max_bytes` and the entry count never
/// exceeds `max_items`. Capacity pressure is resolved by evicting ahead of
/// insertion, so `set` has no failure mode a caller can observe.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-payload storage
    entries: HashMap<String, CacheEntry>,
    /// Sum of size_bytes over all resident entries
    total_bytes: u64,
    /// Byte budget for resident payloads
    max_bytes: u64,
    /// Maximum number of resident entries
    max_items: usize,
    /// Performance statistics
    stats: CacheStats,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore with the given capacity bounds.
    pub fn new(max_bytes: u64, max_items: usize) -> Self {
        Self {
            entries: HashMap::new(),
            total_bytes: 0,
            max_bytes,
            max_items,
            stats: CacheStats::new(),
        }
    }

    // == Get ==
    /// Retrieves a payload by key.
    ///
    /// A hit refreshes the entry's recency, bumps its access count and the
    /// global hit counter (plus the predictive-hit counter for entries the
    /// predictor stored). A miss only bumps the miss counter. Never errors.
    pub fn get(&mut self, key: &str) -> Option<Bytes> {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.touch();
                self.stats.record_hit(entry.predicted);
                Some(entry.payload.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Stores a payload under `key`, evicting first if the insert would
    /// exceed either capacity bound.
    ///
    /// Replacing an existing key subtracts its old size before the capacity
    /// check. A single payload larger than the whole byte budget is the one
    /// case eviction cannot make room for; it is skipped with a warning.
    pub fn set(&mut self, key: String, payload: Bytes, size_bytes: u64, predicted: bool) {
        if size_bytes > self.max_bytes || self.max_items == 0 {
            warn!(
                key = %key,
                size_bytes,
                max_bytes = self.max_bytes,
                "payload cannot fit in cache, skipping"
            );
            return;
        }

        // Replacement: retire the old entry's accounting first.
        if let Some(old) = self.entries.remove(&key) {
            self.total_bytes -= old.size_bytes;
        }

        let need_bytes = (self.total_bytes + size_bytes).saturating_sub(self.max_bytes);
        let need_items = (self.entries.len() + 1).saturating_sub(self.max_items);
        if need_bytes > 0 || need_items > 0 {
            self.evict(need_bytes, need_items);
        }

        self.total_bytes += size_bytes;
        self.entries
            .insert(key, CacheEntry::new(payload, size_bytes, predicted));
    }

    // == Eviction ==
    /// Frees at least `need_bytes` and `need_items` worth of entries.
    ///
    /// Candidates are ordered ascending by `(priority_weight, last_accessed)`:
    /// lowest-weight entries go first, recency breaks ties. Deliberately not
    /// strict LRU — a fresh predicted-only entry is sacrificed ahead of an
    /// older explicitly-requested one.
    fn evict(&mut self, need_bytes: u64, need_items: usize) {
        let mut candidates: Vec<(String, f64, Instant)> = self
            .entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.priority_weight, entry.last_accessed))
            .collect();
        candidates.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.2.cmp(&b.2))
        });

        let mut freed_bytes = 0u64;
        let mut freed_items = 0usize;
        for (key, _, _) in candidates {
            if freed_bytes >= need_bytes && freed_items >= need_items {
                break;
            }
            if let Some(entry) = self.entries.remove(&key) {
                self.total_bytes -= entry.size_bytes;
                freed_bytes += entry.size_bytes;
                freed_items += 1;
                self.stats.record_eviction();
                debug!(key = %key, predicted = entry.predicted, "evicted cache entry");
            }
        }
    }

    // == Contains ==
    /// Checks for a key without touching recency or stats.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Cached Keys ==
    /// All resident keys starting with `prefix` (empty prefix = all keys).
    pub fn cached_keys(&self, prefix: &str) -> Vec<String> {
        self.entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect()
    }

    // == Clear ==
    /// Drops every entry and resets byte accounting.
    pub fn clear_all(&mut self) {
        self.entries.clear();
        self.total_bytes = 0;
    }

    /// Drops all entries whose key starts with `prefix`.
    pub fn clear_scope(&mut self, prefix: &str) {
        let scoped: Vec<String> = self.cached_keys(prefix);
        for key in scoped {
            if let Some(entry) = self.entries.remove(&key) {
                self.total_bytes -= entry.size_bytes;
            }
        }
    }

    // == Expire Stale ==
    /// Removes entries untouched for longer than `timeout`, independent of
    /// capacity pressure. Returns the number of entries removed.
    pub fn expire_stale(&mut self, timeout: Duration) -> usize {
        let stale: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_stale(timeout))
            .map(|(key, _)| key.clone())
            .collect();

        let count = stale.len();
        for key in stale {
            if let Some(entry) = self.entries.remove(&key) {
                self.total_bytes -= entry.size_bytes;
                self.stats.record_expiration();
            }
        }
        count
    }

    // == Limits ==
    /// Applies new capacity bounds; shrinking evicts immediately so the
    /// invariants hold before this returns.
    pub fn set_limits(&mut self, max_bytes: u64, max_items: usize) {
        self.max_bytes = max_bytes;
        self.max_items = max_items;

        let need_bytes = self.total_bytes.saturating_sub(self.max_bytes);
        let need_items = self.entries.len().saturating_sub(self.max_items);
        if need_bytes > 0 || need_items > 0 {
            self.evict(need_bytes, need_items);
        }
    }

    // == Stats ==
    /// Returns a statistics snapshot with current usage filled in.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_usage(self.entries.len(), self.total_bytes);
        stats
    }

    // == Length ==
    /// Returns the current number of resident entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current payload bytes held.
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }
}
