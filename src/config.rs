//! Configuration Module
//!
//! Handles loading and managing engine configuration from environment
//! variables, plus partial runtime overrides.

use std::env;

use serde::Deserialize;

/// Engine configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults, and every field is independently overridable at runtime
/// through [`ConfigUpdate`].
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum total payload bytes the cache may hold
    pub max_cache_bytes: u64,
    /// Maximum number of cached slices
    pub max_items: usize,
    /// Maximum predictions returned (and preloads issued) per request
    pub prediction_window: usize,
    /// Minimum confidence for a prediction to trigger a preload
    pub confidence_threshold: f64,
    /// Idle time after which a cached slice is considered stale (ms)
    pub session_timeout_ms: u64,
    /// Interval between background expiry sweeps (ms)
    pub sweep_interval_ms: u64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_CACHE_BYTES` - Byte budget for cached payloads (default: 500 MiB)
    /// - `MAX_ITEMS` - Maximum cached slices (default: 1000)
    /// - `PREDICTION_WINDOW` - Predictions per request (default: 5)
    /// - `CONFIDENCE_THRESHOLD` - Preload confidence floor (default: 0.3)
    /// - `SESSION_TIMEOUT_MS` - Stale-entry timeout (default: 30 min)
    /// - `SWEEP_INTERVAL_MS` - Sweep cadence (default: 60 s)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_cache_bytes: env_parse("MAX_CACHE_BYTES", defaults.max_cache_bytes),
            max_items: env_parse("MAX_ITEMS", defaults.max_items),
            prediction_window: env_parse("PREDICTION_WINDOW", defaults.prediction_window),
            confidence_threshold: env_parse("CONFIDENCE_THRESHOLD", defaults.confidence_threshold),
            session_timeout_ms: env_parse("SESSION_TIMEOUT_MS", defaults.session_timeout_ms),
            sweep_interval_ms: env_parse("SWEEP_INTERVAL_MS", defaults.sweep_interval_ms),
        }
    }

    /// Applies a partial update, leaving absent fields untouched.
    pub fn apply(&mut self, update: &ConfigUpdate) {
        if let Some(v) = update.max_cache_bytes {
            self.max_cache_bytes = v;
        }
        if let Some(v) = update.max_items {
            self.max_items = v;
        }
        if let Some(v) = update.prediction_window {
            self.prediction_window = v;
        }
        if let Some(v) = update.confidence_threshold {
            self.confidence_threshold = v.clamp(0.0, 1.0);
        }
        if let Some(v) = update.session_timeout_ms {
            self.session_timeout_ms = v;
        }
        if let Some(v) = update.sweep_interval_ms {
            self.sweep_interval_ms = v;
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_cache_bytes: 500 * 1024 * 1024,
            max_items: 1000,
            prediction_window: 5,
            confidence_threshold: 0.3,
            session_timeout_ms: 30 * 60 * 1000,
            sweep_interval_ms: 60 * 1000,
        }
    }
}

/// Partial configuration override for hot reloads.
///
/// Every field is optional; `None` means "keep the current value".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigUpdate {
    pub max_cache_bytes: Option<u64>,
    pub max_items: Option<usize>,
    pub prediction_window: Option<usize>,
    pub confidence_threshold: Option<f64>,
    pub session_timeout_ms: Option<u64>,
    pub sweep_interval_ms: Option<u64>,
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
