//! Interaction Module
//!
//! Records user navigation behavior and derives slice predictions from it.

mod analyzer;
mod event;
mod recorder;

// Re-export public types
pub use analyzer::{PatternAnalyzer, Prediction, PredictionPriority};
pub use event::{InteractionEvent, InteractionKind, NavDirection};
pub use recorder::InteractionRecorder;

// == Public Constants ==
/// Default number of interaction events retained in history
pub const DEFAULT_HISTORY_WINDOW: usize = 1000;

/// Number of recent navigation events considered for direction frequencies
pub const RECENT_NAV_WINDOW: usize = 10;
