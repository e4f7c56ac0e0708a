//! Best-effort conversion of references into request parts.

use crate::{AssetSource, is_image_mime, sniff_mime};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use vermeer_cache::TypedCache;
use vermeer_core::{Part, RequestContext};
use vermeer_error::{AssetError, AssetErrorKind};

/// Builds generation parts from references, cheapest source first.
///
/// A reference that cannot be used is logged and dropped; it never fails the
/// batch.
#[derive(Debug, Clone)]
pub struct PartAssembler {
    source: AssetSource,
    cache: TypedCache,
    ttl: Duration,
}

impl PartAssembler {
    /// Create an assembler that caches fetched bytes for `ttl`.
    pub fn new(source: AssetSource, cache: TypedCache, ttl: Duration) -> Self {
        Self { source, cache, ttl }
    }

    /// Produce at most one part for `source_uri`.
    ///
    /// Priority: a live remote handle, then cached bytes, then a fresh
    /// validated fetch whose bytes are cached on success. Blank URIs yield
    /// `None` without being treated as failures.
    #[instrument(skip(self, ctx))]
    pub async fn prepare(&self, ctx: &RequestContext, source_uri: &str) -> Option<Part> {
        if source_uri.trim().is_empty() {
            debug!("Skipping blank reference");
            return None;
        }

        let handle = match ctx.run(self.cache.handle(source_uri)).await {
            Ok(handle) => handle,
            Err(reason) => return skip(source_uri, &AssetError::from(reason)),
        };
        if let Some(handle) = handle {
            return Some(handle.to_part());
        }

        let cached = match ctx.run(self.cache.bytes(source_uri)).await {
            Ok(cached) => cached,
            Err(reason) => return skip(source_uri, &AssetError::from(reason)),
        };
        if let Some(data) = cached {
            let mime_type = sniff_mime(&data);
            if !is_image_mime(mime_type) {
                let error = AssetError::new(AssetErrorKind::UnsupportedContent(mime_type.to_string()));
                return skip(source_uri, &error);
            }
            return Some(Part::InlineImage {
                mime_type: mime_type.to_string(),
                data,
            });
        }

        let reference = self.source.classify(source_uri);
        let acquired = match self.source.acquire(ctx, &reference).await {
            Ok(acquired) => acquired,
            Err(e) => return skip(source_uri, &e),
        };
        let (data, mime_type) = acquired.into_parts();

        if let Err(reason) = ctx
            .run(self.cache.put_bytes(source_uri, data.clone(), self.ttl))
            .await
        {
            // The bytes are in hand; only the cache write was cut short.
            debug!(%reason, "Cache write interrupted");
        }

        Some(Part::InlineImage {
            mime_type: mime_type.to_string(),
            data,
        })
    }

    /// Text part followed by one part per usable reference, in caller order.
    #[instrument(skip(self, ctx, prompt, source_uris), fields(references = source_uris.len()))]
    pub async fn assemble<S>(&self, ctx: &RequestContext, prompt: &str, source_uris: &[S]) -> Vec<Part>
    where
        S: AsRef<str> + Sync,
    {
        let mut parts = Vec::with_capacity(source_uris.len() + 1);
        parts.push(Part::Text(prompt.to_string()));
        for uri in source_uris {
            if let Some(part) = self.prepare(ctx, uri.as_ref()).await {
                parts.push(part);
            }
        }
        debug!(images = parts.len() - 1, "Assembled parts");
        parts
    }
}

fn skip(source_uri: &str, error: &AssetError) -> Option<Part> {
    match error.kind() {
        AssetErrorKind::Interrupted(reason) => {
            warn!(source_uri, %reason, "Dropping reference after interruption");
        }
        kind => warn!(source_uri, error = %kind, "Dropping unusable reference"),
    }
    None
}
