//! Cache Module
//!
//! Provides the bounded in-memory slice store with priority+recency eviction.

mod entry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{CacheEntry, EXPLICIT_WEIGHT, PREDICTED_WEIGHT};
pub use stats::CacheStats;
pub use store::CacheStore;
