//! Typed access to the two cache namespaces.

use crate::{AssetCache, CacheValue, bytes_key, handle_key};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use vermeer_core::RemoteHandle;

/// Namespaced view over a shared [`AssetCache`].
///
/// Values of the wrong type under a key are logged and treated as a miss.
#[derive(Clone)]
pub struct TypedCache {
    backend: Arc<dyn AssetCache>,
}

impl std::fmt::Debug for TypedCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedCache").finish_non_exhaustive()
    }
}

impl TypedCache {
    /// Wrap a backend.
    pub fn new(backend: Arc<dyn AssetCache>) -> Self {
        Self { backend }
    }

    /// The underlying backend.
    pub fn backend(&self) -> &Arc<dyn AssetCache> {
        &self.backend
    }

    /// Cached bytes for `source_uri`.
    pub async fn bytes(&self, source_uri: &str) -> Option<Vec<u8>> {
        match self.backend.get(&bytes_key(source_uri)).await? {
            CacheValue::Bytes(data) => {
                debug!(source_uri, bytes = data.len(), "Using cached bytes");
                Some(data)
            }
            other => {
                warn!(
                    source_uri,
                    found = other.variant_name(),
                    "Unexpected value in bytes namespace"
                );
                None
            }
        }
    }

    /// Store bytes for `source_uri`.
    pub async fn put_bytes(&self, source_uri: &str, data: Vec<u8>, ttl: Duration) {
        self.backend
            .set(&bytes_key(source_uri), CacheValue::Bytes(data), ttl)
            .await;
    }

    /// Live registration for `source_uri`.
    pub async fn handle(&self, source_uri: &str) -> Option<RemoteHandle> {
        match self.backend.get(&handle_key(source_uri)).await? {
            CacheValue::Handle(handle) if handle.is_live(Utc::now()) => {
                debug!(source_uri, uri = %handle.uri(), "Using cached remote handle");
                Some(handle)
            }
            CacheValue::Handle(_) => {
                debug!(source_uri, "Cached remote handle has expired");
                None
            }
            other => {
                warn!(
                    source_uri,
                    found = other.variant_name(),
                    "Unexpected value in handle namespace"
                );
                None
            }
        }
    }

    /// Store the registration for `source_uri` as one entry.
    pub async fn put_handle(&self, source_uri: &str, handle: RemoteHandle, ttl: Duration) {
        self.backend
            .set(&handle_key(source_uri), CacheValue::Handle(handle), ttl)
            .await;
    }

    /// Forget the registration for `source_uri`.
    pub async fn remove_handle(&self, source_uri: &str) {
        self.backend.remove(&handle_key(source_uri)).await;
    }
}
