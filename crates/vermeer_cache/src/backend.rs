//! The cache backend contract.

use crate::CacheValue;
use async_trait::async_trait;
use std::time::Duration;

/// A shared TTL key/value store.
///
/// Usage is strictly cache-aside: callers check before doing work, populate
/// after success, and treat a miss as normal. Implementations need no
/// cross-key locking; concurrent writers for one key may race and the last
/// write wins.
#[async_trait]
pub trait AssetCache: Send + Sync {
    /// Look up a live value.
    async fn get(&self, key: &str) -> Option<CacheValue>;

    /// Store a value for `ttl`.
    async fn set(&self, key: &str, value: CacheValue, ttl: Duration);

    /// Drop a value if present.
    async fn remove(&self, key: &str);
}
