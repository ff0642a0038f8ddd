//! Slice Cache - predictive slice caching for medical image viewers
//!
//! Combines a bounded in-memory payload store, an online navigation-pattern
//! analyzer and a background preloading scheduler so that stepping through
//! an image stack never waits on the wire for slices the engine saw coming.

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod interaction;
pub mod tasks;

pub use cache::{CacheStats, CacheStore};
pub use config::{CacheConfig, ConfigUpdate};
pub use engine::{slice_key, SliceCacheEngine};
pub use error::{LoadError, Result};
pub use interaction::{
    InteractionEvent, InteractionKind, NavDirection, PatternAnalyzer, Prediction,
    PredictionPriority,
};
pub use tasks::spawn_sweep_task;
