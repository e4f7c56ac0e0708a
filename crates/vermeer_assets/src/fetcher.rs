//! Byte retrieval for validated references.

use crate::FetchConfig;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, instrument};
use vermeer_core::{AssetReference, RequestContext};
use vermeer_error::{
    AssetError, AssetErrorKind, AssetResult, HttpError, StorageError, StorageErrorKind,
};

/// Fetches bytes over HTTP(S).
///
/// Implementations need not check URL safety; callers validate first.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// Download the full body at `url`.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, HttpError>;
}

/// Streaming reader returned by [`ObjectStorage::open`].
pub type ObjectReader = Box<dyn AsyncRead + Send + Unpin>;

/// Opens objects by storage URI, e.g. `gs://bucket/key`.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Open a stream over the object's contents.
    async fn open(&self, uri: &str) -> Result<ObjectReader, StorageError>;
}

/// [`HttpFetcher`] built on reqwest.
///
/// Redirects are not followed since the target of a redirect has not been
/// validated. Non-success statuses and oversized bodies are errors.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    max_bytes: usize,
}

impl ReqwestFetcher {
    /// Build a fetcher with the given limits.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be constructed.
    pub fn new(config: &FetchConfig) -> Result<Self, HttpError> {
        Self::from_builder(client_builder(config), config)
    }

    fn from_builder(builder: reqwest::ClientBuilder, config: &FetchConfig) -> Result<Self, HttpError> {
        let client = builder
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            max_bytes: *config.max_bytes(),
        })
    }

    fn too_large(&self, size: usize) -> HttpError {
        HttpError::new(format!(
            "Payload of {} bytes exceeds limit of {} bytes",
            size, self.max_bytes
        ))
    }
}

fn client_builder(config: &FetchConfig) -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .timeout(config.timeout())
        .redirect(reqwest::redirect::Policy::none())
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    #[instrument(skip(self))]
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::with_status(
                status.as_u16(),
                status.canonical_reason().unwrap_or("unsuccessful response"),
            ));
        }

        if let Some(length) = response.content_length() {
            let length = usize::try_from(length).unwrap_or(usize::MAX);
            if length > self.max_bytes {
                return Err(self.too_large(length));
            }
        }

        let mut data = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| HttpError::new(format!("Failed to read body: {}", e)))?
        {
            if data.len() + chunk.len() > self.max_bytes {
                return Err(self.too_large(data.len() + chunk.len()));
            }
            data.extend_from_slice(&chunk);
        }

        debug!(bytes = data.len(), "Downloaded body");
        Ok(data)
    }
}

/// Dispatches a reference to object storage or HTTP by its kind.
#[derive(Clone)]
pub struct AssetFetcher {
    http: Arc<dyn HttpFetcher>,
    storage: Option<Arc<dyn ObjectStorage>>,
}

impl std::fmt::Debug for AssetFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetFetcher")
            .field("object_storage", &self.storage.is_some())
            .finish_non_exhaustive()
    }
}

impl AssetFetcher {
    /// Fetcher without object storage support.
    pub fn new(http: Arc<dyn HttpFetcher>) -> Self {
        Self {
            http,
            storage: None,
        }
    }

    /// Add an object storage backend.
    pub fn with_object_storage(mut self, storage: Arc<dyn ObjectStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Retrieve the bytes behind an already validated reference.
    ///
    /// Failures are reported as [`AssetErrorKind::AssetUnavailable`]; the
    /// caller decides whether that is fatal.
    #[instrument(skip(self, ctx, reference), fields(source_uri = %reference.source_uri(), kind = %reference.kind()))]
    pub async fn fetch(&self, ctx: &RequestContext, reference: &AssetReference) -> AssetResult<Vec<u8>> {
        let uri = reference.source_uri();
        let data = if reference.is_object_storage() {
            let storage = self.storage.as_ref().ok_or_else(|| {
                unavailable(StorageError::new(StorageErrorKind::Unconfigured(
                    uri.to_string(),
                )))
            })?;
            ctx.run(read_object(storage.as_ref(), uri))
                .await?
                .map_err(unavailable)?
        } else {
            ctx.run(self.http.fetch_bytes(uri))
                .await?
                .map_err(unavailable)?
        };
        debug!(bytes = data.len(), "Fetched asset");
        Ok(data)
    }
}

async fn read_object(storage: &dyn ObjectStorage, uri: &str) -> Result<Vec<u8>, StorageError> {
    let mut reader = storage.open(uri).await?;
    let mut data = Vec::new();
    reader
        .read_to_end(&mut data)
        .await
        .map_err(|e| StorageError::new(StorageErrorKind::Io(e.to_string())))?;
    Ok(data)
}

#[track_caller]
fn unavailable(err: impl std::fmt::Display) -> AssetError {
    debug!(error = %err, "Asset fetch failed");
    AssetError::new(AssetErrorKind::AssetUnavailable(err.to_string()))
}
