//! Validate, fetch, compress and sniff a single reference.

use crate::{AssetFetcher, Compressor, UrlValidator, is_image_mime, sniff_mime};
use tracing::{debug, instrument};
use vermeer_core::{AssetReference, RequestContext};
use vermeer_error::{AssetError, AssetErrorKind, AssetResult};

/// Image bytes ready to send, with their sniffed MIME type.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct Acquired {
    data: Vec<u8>,
    mime_type: &'static str,
}

impl Acquired {
    /// Split into bytes and MIME type.
    pub fn into_parts(self) -> (Vec<u8>, &'static str) {
        (self.data, self.mime_type)
    }
}

/// The uncached path shared by part assembly and registration.
#[derive(Debug, Clone)]
pub struct AssetSource {
    validator: UrlValidator,
    fetcher: AssetFetcher,
    compressor: Compressor,
}

impl AssetSource {
    /// Combine the three capabilities.
    pub fn new(validator: UrlValidator, fetcher: AssetFetcher, compressor: Compressor) -> Self {
        Self {
            validator,
            fetcher,
            compressor,
        }
    }

    /// Classify a raw URI with the configured object storage schemes.
    pub fn classify(&self, source_uri: &str) -> AssetReference {
        AssetReference::classify(source_uri, self.validator.config().object_storage_schemes())
    }

    /// Run validate, fetch, compress and sniff in that order.
    ///
    /// # Errors
    ///
    /// `RejectedReference` from validation, `AssetUnavailable` from the
    /// fetch, `UnsupportedContent` when the final bytes are not an image, or
    /// `Interrupted` when the context ends first.
    #[instrument(skip(self, ctx, reference), fields(source_uri = %reference.source_uri()))]
    pub async fn acquire(&self, ctx: &RequestContext, reference: &AssetReference) -> AssetResult<Acquired> {
        self.validator.validate(ctx, reference).await?;
        let data = self.fetcher.fetch(ctx, reference).await?;
        let data = self.compressor.apply(data);

        let mime_type = sniff_mime(&data);
        if !is_image_mime(mime_type) {
            return Err(AssetError::new(AssetErrorKind::UnsupportedContent(
                mime_type.to_string(),
            )));
        }

        debug!(mime_type, bytes = data.len(), "Acquired asset");
        Ok(Acquired { data, mime_type })
    }
}
