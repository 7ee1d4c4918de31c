//! CacheStorage port - session-scoped key/value persistence for the wishlist cache.
//!
//! Values are opaque strings. Calls are synchronous; the cache layer above
//! treats every error as a miss.

use thiserror::Error;

/// Errors that can occur during cache storage operations
#[derive(Debug, Error)]
pub enum CacheStorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Port for the persisted half of the wishlist cache.
pub trait CacheStorage: Send + Sync {
    /// Read a value. `Ok(None)` when nothing is stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, CacheStorageError>;

    /// Store a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), CacheStorageError>;

    /// Remove a value. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), CacheStorageError>;
}
