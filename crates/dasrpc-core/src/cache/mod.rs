//! Cache port — the get/set/delete capability any cache backend provides.
//!
//! Backends:
//! - [`memory`] — in-process map with lazy per-entry expiry (the default)
//!
//! Networked stores plug in by implementing [`CachePort`]; callers never
//! need to know which backend is in use.

pub mod memory;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::{CacheEntry, MemoryCache};

/// Errors a cache backend may report.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The backend itself failed (connection lost, store unavailable, ...).
    #[error("cache backend error: {0}")]
    Backend(String),

    /// A value could not be serialized for storage.
    #[error("cache serialization error: {0}")]
    Serialization(String),
}

/// String-keyed store of serialized values with optional TTL.
///
/// A `get` of an expired entry must behave exactly like a `get` of a key
/// that was never set. Concurrent writers to one key may race;
/// last write wins.
#[async_trait]
pub trait CachePort: Send + Sync {
    /// Fetch the value stored under `key`, if present and not expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`. `ttl = None` means the entry never expires.
    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<(), CacheError>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}
