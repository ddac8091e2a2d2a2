//! Cache module for storing fetched API rows
//!
//! [`CacheStore`] is the keyed get/set/invalidate contract the fetcher relies on.
//! Two backends implement it: [`CacheManager`] persists entries as JSON files with
//! an expiry timestamp, and [`MemoryCache`] keeps them in a mutex-guarded map for
//! single-process use and tests. In both, an expired entry reads as absent.

mod manager;
mod memory;

pub use manager::{CacheManager, CachedData};
pub use memory::MemoryCache;

use thiserror::Error;

use crate::fetcher::RawRow;

/// Errors that can occur when writing or removing cache entries
#[derive(Debug, Error)]
pub enum CacheError {
    /// Filesystem operation failed
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload could not be serialized
    #[error("Failed to serialize cache entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Keyed ephemeral storage with expiry
///
/// Implementations must be safe to share between request-handling threads.
pub trait CacheStore: Send + Sync {
    /// Returns the payload for `key`, or `None` if it was never set or has expired
    fn get(&self, key: &str) -> Option<Vec<RawRow>>;

    /// Replaces the entry for `key`, expiring it after `ttl_secs`
    fn set(&self, key: &str, payload: &[RawRow], ttl_secs: u64) -> Result<(), CacheError>;

    /// Removes the entry for `key`; a missing entry is not an error
    fn invalidate(&self, key: &str) -> Result<(), CacheError>;
}

impl<T: CacheStore + ?Sized> CacheStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Option<Vec<RawRow>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, payload: &[RawRow], ttl_secs: u64) -> Result<(), CacheError> {
        (**self).set(key, payload, ttl_secs)
    }

    fn invalidate(&self, key: &str) -> Result<(), CacheError> {
        (**self).invalidate(key)
    }
}

impl<T: CacheStore + ?Sized> CacheStore for Box<T> {
    fn get(&self, key: &str) -> Option<Vec<RawRow>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, payload: &[RawRow], ttl_secs: u64) -> Result<(), CacheError> {
        (**self).set(key, payload, ttl_secs)
    }

    fn invalidate(&self, key: &str) -> Result<(), CacheError> {
        (**self).invalidate(key)
    }
}
