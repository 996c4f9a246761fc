use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::{CacheError, CacheStore};

/// Entry count at which a write first sweeps out expired entries
const DEFAULT_SWEEP_THRESHOLD: usize = 1024;

/// Entries and the size at which the next sweep runs
#[derive(Debug)]
struct Entries {
    /// Value and expiry instant per key
    map: HashMap<String, (String, Instant)>,
    /// A write that grows the map to this size sweeps it first
    sweep_at: usize,
}

/// In-process cache store.
///
/// Used when no cache endpoint is configured, and in tests. An expired entry
/// is dropped when it is read, or by the sweep a write runs once the map
/// reaches the sweep threshold. After a sweep the threshold is set to twice
/// the surviving entries, so sweeping stays amortized constant per write.
#[derive(Debug)]
pub struct MemoryCache {
    /// Entries behind one lock
    entries: RwLock<Entries>,
    /// Lower bound of the sweep threshold
    min_sweep_at: usize,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::with_sweep_threshold(DEFAULT_SWEEP_THRESHOLD)
    }
}

impl MemoryCache {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store whose writes sweep expired entries once it holds
    /// `threshold` entries
    #[must_use]
    pub fn with_sweep_threshold(threshold: usize) -> Self {
        let threshold = threshold.max(1);
        Self {
            entries: RwLock::new(Entries {
                map: HashMap::new(),
                sweep_at: threshold,
            }),
            min_sweep_at: threshold,
        }
    }

    /// Number of live entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .map
            .values()
            .filter(|(_, expires_at)| *expires_at > now)
            .count()
    }

    /// True if there is no live entry
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.map.get(key) {
                Some((value, expires_at)) if *expires_at > now => return Ok(Some(value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired: drop it unless a fresh write landed in between.
        let mut entries = self.entries.write().await;
        if entries
            .map
            .get(key)
            .is_some_and(|(_, expires_at)| *expires_at <= Instant::now())
        {
            entries.map.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        if entries.map.len() >= entries.sweep_at && !entries.map.contains_key(key) {
            entries.map.retain(|_, (_, expires_at)| *expires_at > now);
            entries.sweep_at = (entries.map.len() * 2).max(self.min_sweep_at);
        }

        entries
            .map
            .insert(key.to_string(), (value.to_string(), now + ttl));
        Ok(())
    }
}
