//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of an engine.
//!
//! # Tasks
//! - Session sweep: expires stale cache entries at configured intervals

mod sweep;

pub use sweep::spawn_sweep_task;
