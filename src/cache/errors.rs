//! Cache error types

use thiserror::Error;

/// Errors raised by the cache backend itself.
///
/// These never describe a business failure. `TaggedCache::get_or_set` absorbs
/// every variant and falls through to the fetch function.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to serialize or deserialize a cached value
    #[error("Cache serialization error for key '{key}': {reason}")]
    Serialization { key: String, reason: String },

    /// The store is full and no expired entries could be reclaimed
    #[error("Cache capacity exceeded: {max_entries} entries")]
    CapacityExceeded { max_entries: usize },
}

impl CacheError {
    pub(crate) fn serialization<K: Into<String>, E: std::fmt::Display>(key: K, error: E) -> Self {
        Self::Serialization {
            key: key.into(),
            reason: error.to_string(),
        }
    }
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;
