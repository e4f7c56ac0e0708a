//! In-process TTL cache.

use crate::{AssetCache, CacheValue};
use async_trait::async_trait;
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument, trace};

/// Configuration for [`MemoryCache`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct MemoryCacheConfig {
    /// TTL in seconds applied when a caller passes a zero duration
    default_ttl_secs: u64,
    /// Maximum number of entries before the least recently used is evicted
    max_entries: usize,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: 3600,
            max_entries: 512,
        }
    }
}

/// A cached value with its bookkeeping.
#[derive(Debug, Clone, Getters)]
pub struct CacheEntry {
    /// Stored value
    value: CacheValue,
    /// When the entry stops being returned
    expires_at: Instant,
    /// Last read or write
    last_accessed: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// HashMap-backed [`AssetCache`] for a single process.
///
/// Expired entries are never returned and are swept lazily. When the cache is
/// full the least recently accessed entry is evicted.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use vermeer_cache::{AssetCache, CacheValue, MemoryCache, MemoryCacheConfig};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let cache = MemoryCache::new(MemoryCacheConfig::default().with_max_entries(8));
/// cache.set("k", CacheValue::Bytes(vec![1, 2]), Duration::from_secs(60)).await;
/// assert_eq!(cache.get("k").await, Some(CacheValue::Bytes(vec![1, 2])));
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryCache {
    config: MemoryCacheConfig,
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new(config: MemoryCacheConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &MemoryCacheConfig {
        &self.config
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether no entries are stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Remove every entry.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Remove expired entries and return how many were dropped.
    #[instrument(skip(self))]
    pub async fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - entries.len();
        debug!(removed, "Swept expired cache entries");
        removed
    }

    fn effective_ttl(&self, ttl: Duration) -> Duration {
        if ttl.is_zero() {
            Duration::from_secs(self.config.default_ttl_secs)
        } else {
            ttl
        }
    }

    fn evict_lru(entries: &mut HashMap<String, CacheEntry>) {
        let oldest = entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_accessed)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            debug!(key = %key, "Evicting least recently used cache entry");
            entries.remove(&key);
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(MemoryCacheConfig::default())
    }
}

#[async_trait]
impl AssetCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<CacheValue> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let expired = match entries.get_mut(key) {
            None => {
                trace!(key, "Cache miss");
                return None;
            }
            Some(entry) if entry.is_expired(now) => true,
            Some(entry) => {
                entry.last_accessed = now;
                trace!(key, "Cache hit");
                return Some(entry.value.clone());
            }
        };
        if expired {
            trace!(key, "Cache entry expired");
            entries.remove(key);
        }
        None
    }

    async fn set(&self, key: &str, value: CacheValue, ttl: Duration) {
        let now = Instant::now();
        let ttl = self.effective_ttl(ttl);
        let mut entries = self.entries.lock().await;

        if !entries.contains_key(key) {
            entries.retain(|_, entry| !entry.is_expired(now));
            if self.config.max_entries > 0 && entries.len() >= self.config.max_entries {
                Self::evict_lru(&mut entries);
            }
        }

        trace!(key, kind = value.variant_name(), ttl_secs = ttl.as_secs(), "Cache set");
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: now + ttl,
                last_accessed: now,
            },
        );
    }

    async fn remove(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }
}
