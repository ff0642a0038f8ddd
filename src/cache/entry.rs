//! Cache Entry Module
//!
//! Defines the structure for individual cached slices with access tracking.

use bytes::Bytes;
use tokio::time::{Duration, Instant};

// == Priority Weights ==
/// Weight for entries stored via explicit application requests
pub const EXPLICIT_WEIGHT: f64 = 1.0;

/// Weight for entries stored speculatively by the predictor
pub const PREDICTED_WEIGHT: f64 = 0.5;

// == Cache Entry ==
/// A single cached slice payload with eviction metadata.
///
/// Predicted entries carry half the priority weight of explicit ones:
/// an explicit request represents confirmed need, a prediction only a guess.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Opaque slice payload
    pub payload: Bytes,
    /// Payload size as reported by the loader
    pub size_bytes: u64,
    /// Last time this entry was read or written
    pub last_accessed: Instant,
    /// Number of reads since insertion
    pub access_count: u64,
    /// Eviction weight; lower evicts first
    pub priority_weight: f64,
    /// Whether this entry was populated speculatively
    pub predicted: bool,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry, weighted by how it was requested.
    pub fn new(payload: Bytes, size_bytes: u64, predicted: bool) -> Self {
        Self {
            payload,
            size_bytes,
            last_accessed: Instant::now(),
            access_count: 0,
            priority_weight: if predicted { PREDICTED_WEIGHT } else { EXPLICIT_WEIGHT },
            predicted,
        }
    }

    // == Touch ==
    /// Marks the entry as accessed now.
    pub fn touch(&mut self) {
        self.last_accessed = Instant::now();
        self.access_count += 1;
    }

    // == Is Stale ==
    /// True once the entry has sat untouched longer than `timeout`.
    pub fn is_stale(&self, timeout: Duration) -> bool {
        self.last_accessed.elapsed() > timeout
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_entry_full_weight() {
        let entry = CacheEntry::new(Bytes::from_static(b"pixels"), 6, false);

        assert_eq!(entry.priority_weight, EXPLICIT_WEIGHT);
        assert!(!entry.predicted);
        assert_eq!(entry.access_count, 0);
    }

    #[test]
    fn test_predicted_entry_half_weight() {
        let entry = CacheEntry::new(Bytes::from_static(b"pixels"), 6, true);

        assert_eq!(entry.priority_weight, PREDICTED_WEIGHT);
        assert!(entry.predicted);
    }

    #[test]
    fn test_touch_bumps_access_count() {
        let mut entry = CacheEntry::new(Bytes::from_static(b"pixels"), 6, false);
        let created = entry.last_accessed;

        entry.touch();
        entry.touch();

        assert_eq!(entry.access_count, 2);
        assert!(entry.last_accessed >= created);
    }

    #[tokio::test(start_paused = true)]
    async fn test_staleness_boundary() {
        let entry = CacheEntry::new(Bytes::from_static(b"pixels"), 6, false);

        assert!(!entry.is_stale(Duration::from_secs(60)));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(entry.is_stale(Duration::from_secs(60)));
    }
}
