//! Error types for the distributed cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type surfaced by cache operations.
///
/// Absence of a key is not an error: `get` returns `Ok(None)` for keys that
/// are missing or logically expired.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Invalid entry or cache configuration.
    ///
    /// Raised when an entry is created with an absolute expiration that is
    /// not in the future, or when required configuration fields
    /// (database/collection/hosts) are missing or empty.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Error propagated verbatim from the storage accessor.
    ///
    /// This layer performs no retry and no suppression.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

// == Storage Error Enum ==
/// Errors produced by storage accessor implementations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backing store could not be reached or rejected the request.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// A storage call exceeded the transport's deadline.
    #[error("Storage request timed out: {0}")]
    Timeout(String),
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
