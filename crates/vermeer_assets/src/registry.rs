//! Registration of reference images with the remote asset store.

use crate::AssetSource;
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use vermeer_cache::TypedCache;
use vermeer_core::{RemoteAssetStore, RemoteHandle, RequestContext};
use vermeer_error::{AssetError, AssetErrorKind, AssetResult};

/// Uploads and deletes remote copies of references, idempotent via the cache.
///
/// Unlike part assembly every failure here is returned to the caller.
#[derive(Clone)]
pub struct AssetRegistry {
    source: AssetSource,
    cache: TypedCache,
    store: Arc<dyn RemoteAssetStore>,
    ttl: Duration,
}

impl std::fmt::Debug for AssetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetRegistry")
            .field("source", &self.source)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl AssetRegistry {
    /// Create a registry whose handles stay trusted for `ttl`.
    pub fn new(
        source: AssetSource,
        cache: TypedCache,
        store: Arc<dyn RemoteAssetStore>,
        ttl: Duration,
    ) -> Self {
        Self {
            source,
            cache,
            store,
            ttl,
        }
    }

    /// Upload `source_uri` unless a live registration exists; return the handle URI.
    ///
    /// # Errors
    ///
    /// Any acquisition error, `RegistrationFailure` when the upload fails, or
    /// `Interrupted` when the context ends before the upload completes. Once
    /// the upload has succeeded the handle is cached and returned.
    #[instrument(skip(self, ctx))]
    pub async fn register(&self, ctx: &RequestContext, source_uri: &str) -> AssetResult<String> {
        if source_uri.trim().is_empty() {
            return Err(AssetError::new(AssetErrorKind::RejectedReference(
                "empty source URI".to_string(),
            )));
        }

        if let Some(handle) = ctx.run(self.cache.handle(source_uri)).await? {
            debug!(uri = %handle.uri(), "Reusing existing registration");
            return Ok(handle.uri().clone());
        }

        let reference = self.source.classify(source_uri);
        let (data, mime_type) = self.source.acquire(ctx, &reference).await?.into_parts();
        let display_name = reference.file_name();

        let uploaded = ctx
            .run(self.store.upload(&data, mime_type, display_name))
            .await?
            .map_err(|e| {
                error!(error = %e, "Remote upload failed");
                AssetError::new(AssetErrorKind::RegistrationFailure(e.to_string()))
            })?;

        let handle = RemoteHandle::new(
            uploaded.uri.clone(),
            uploaded.name,
            mime_type,
            expiry_after(Utc::now(), self.ttl),
        );
        // The remote file exists now; record it even if the context has ended
        // so it can still be unregistered.
        self.cache.put_handle(source_uri, handle, self.ttl).await;
        if let Err(interrupted) = ctx.check() {
            debug!(%interrupted, "Context ended after upload, handle kept");
        }

        info!(uri = %uploaded.uri, mime_type, bytes = data.len(), "Registered asset");
        Ok(uploaded.uri)
    }

    /// Delete the remote copy of `source_uri` and forget its handle.
    ///
    /// # Errors
    ///
    /// `HandleNotFound` when no live registration exists, so a stale or
    /// guessed name is never deleted. `RegistrationFailure` when the remote
    /// delete fails, in which case the handle is kept.
    #[instrument(skip(self, ctx))]
    pub async fn unregister(&self, ctx: &RequestContext, source_uri: &str) -> AssetResult<()> {
        let handle = ctx
            .run(self.cache.handle(source_uri))
            .await?
            .ok_or_else(|| AssetError::new(AssetErrorKind::HandleNotFound(source_uri.to_string())))?;

        ctx.run(self.store.delete(handle.name()))
            .await?
            .map_err(|e| {
                error!(error = %e, name = %handle.name(), "Remote delete failed");
                AssetError::new(AssetErrorKind::RegistrationFailure(e.to_string()))
            })?;

        self.cache.remove_handle(source_uri).await;
        info!(name = %handle.name(), "Unregistered asset");
        Ok(())
    }
}

/// `now + ttl`, saturating at the latest representable instant.
fn expiry_after(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(ttl)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
