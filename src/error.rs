//! Error types for the cache layer
//!
//! Provides unified error handling using thiserror. These errors never cross
//! the public cache or wrapper boundary; they are logged and degraded there.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for storage and cache internals.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The storage backend rejected or failed an operation
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem failure in a persistent storage backend
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored entry or payload could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key cannot be stored (empty or not representable by the backend)
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

// == Result Type Alias ==
/// Convenience Result type for cache internals.
pub type Result<T> = std::result::Result<T, CacheError>;
