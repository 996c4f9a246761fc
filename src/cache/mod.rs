//! Key/value store with per-key time-to-live.
//!
//! The store is the only authority on expiry: once a key's TTL has elapsed a
//! `get` returns `None`. Values are plain strings at this level; the typed
//! view used by the pricing core lives in [`typed`].

use async_trait::async_trait;
use std::time::Duration;

/// In-process store
pub mod memory;
/// Redis backed store
pub mod redis_cache;
/// Typed accessors per cached value kind
pub mod typed;

pub use self::memory::MemoryCache;
pub use self::redis_cache::RedisCache;
pub use self::typed::TypedCache;

/// Errors raised by a cache store
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The store could not be reached or refused the command
    #[error("cache backend error: {0}")]
    Backend(String),
    /// A stored value could not be read back as the expected kind
    #[error("malformed cached value under {key}: {value}")]
    Malformed {
        /// Key that was read
        key: String,
        /// Raw value found
        value: String,
    },
}

/// String key/value store with TTL.
///
/// Each `get` / `set` is atomic on its own key. Concurrent writers to the
/// same key: the last write wins.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Value stored under `key`, `None` if absent or expired.
    ///
    /// # Errors
    /// * If the store cannot be reached
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key`, expiring `ttl` after this write.
    ///
    /// # Errors
    /// * If the store cannot be reached
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}
