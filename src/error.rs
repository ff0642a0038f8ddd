//! Error types for the slice cache engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Load Error Enum ==
/// Errors surfaced by an injected slice loader.
///
/// The engine never constructs these on its own behalf: cache mutations are
/// infallible (capacity pressure is resolved by eviction, not by failing).
/// A `LoadError` only reaches a caller through an explicit `load_slice` whose
/// loader failed; speculative preload failures are logged and swallowed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The requested slice does not exist in the source dataset
    #[error("Slice not found: {0}")]
    NotFound(String),

    /// The transport underneath the loader failed (network, disk, IPC)
    #[error("Slice transport failed: {0}")]
    Transport(String),

    /// The payload was fetched but could not be decoded into usable bytes
    #[error("Slice decode failed: {0}")]
    Decode(String),
}

// == Result Type Alias ==
/// Convenience Result type for loader-facing engine operations.
pub type Result<T> = std::result::Result<T, LoadError>;
