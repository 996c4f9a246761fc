use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::{CacheError, CacheStore};

impl From<redis::RedisError> for CacheError {
    fn from(e: redis::RedisError) -> Self {
        Self::Backend(e.to_string())
    }
}

/// Cache store backed by Redis.
///
/// TTLs map onto `SET key value EX ttl`, so expiry is enforced by the server.
#[derive(Clone)]
pub struct RedisCache {
    /// Multiplexed, auto-reconnecting connection
    conn: ConnectionManager,
}

impl RedisCache {
    /// Connects to the Redis server at `url` (`redis://host:port`).
    ///
    /// # Errors
    /// * If the URL is invalid
    /// * If the initial connection fails
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        log::info!("cache::redis: Connected to {url}");
        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        Ok(conn.get::<_, Option<String>>(key).await?)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        // EX 0 is rejected by the server
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, seconds).await?;
        Ok(())
    }
}
