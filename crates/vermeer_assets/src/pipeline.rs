//! The asset pipeline with its collaborators injected.

use crate::{
    AssetFetcher, AssetRegistry, AssetSource, Compressor, HttpFetcher, ObjectStorage,
    PartAssembler, PipelineConfig, Resolver, SystemResolver, UrlValidator,
};
use std::sync::Arc;
use tracing::instrument;
use vermeer_cache::{AssetCache, TypedCache};
use vermeer_core::{GenerationResponse, ImageOutput, Part, RemoteAssetStore, RequestContext};
use vermeer_error::{AssetError, AssetErrorKind, AssetResult, GenerationResult};

/// Validator, fetcher, compressor, cache and registration wired together.
///
/// The pipeline spawns nothing; callers that want references processed
/// concurrently drive several calls themselves.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use vermeer_assets::{AssetPipeline, FetchConfig, PipelineConfig, ReqwestFetcher};
/// use vermeer_cache::{MemoryCache, MemoryCacheConfig};
/// use vermeer_core::RequestContext;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let cache = Arc::new(MemoryCache::new(MemoryCacheConfig::default()));
/// let http = Arc::new(ReqwestFetcher::new(&FetchConfig::default())?);
/// let pipeline = AssetPipeline::new(PipelineConfig::default(), cache, http);
///
/// let ctx = RequestContext::new();
/// let parts = pipeline
///     .assemble_parts(&ctx, "a lighthouse at dusk", &["https://example.com/ref.png"])
///     .await;
/// assert!(!parts.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AssetPipeline {
    config: PipelineConfig,
    cache: TypedCache,
    http: Arc<dyn HttpFetcher>,
    resolver: Arc<dyn Resolver>,
    storage: Option<Arc<dyn ObjectStorage>>,
    store: Option<Arc<dyn RemoteAssetStore>>,
    assembler: PartAssembler,
    registry: Option<AssetRegistry>,
}

impl std::fmt::Debug for AssetPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetPipeline")
            .field("config", &self.config)
            .field("object_storage", &self.storage.is_some())
            .field("remote_store", &self.store.is_some())
            .finish_non_exhaustive()
    }
}

impl AssetPipeline {
    /// Pipeline using the system resolver, without object storage or a
    /// remote asset store.
    pub fn new(
        config: PipelineConfig,
        cache: Arc<dyn AssetCache>,
        http: Arc<dyn HttpFetcher>,
    ) -> Self {
        let cache = TypedCache::new(cache);
        let resolver: Arc<dyn Resolver> = Arc::new(SystemResolver);
        let source = build_source(&config, &http, &resolver, None);
        let assembler = PartAssembler::new(source, cache.clone(), config.cache_ttl());
        Self {
            config,
            cache,
            http,
            resolver,
            storage: None,
            store: None,
            assembler,
            registry: None,
        }
    }

    /// Replace the host name resolver.
    pub fn with_resolver(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.resolver = resolver;
        self.rebuild()
    }

    /// Enable object storage references.
    pub fn with_object_storage(mut self, storage: Arc<dyn ObjectStorage>) -> Self {
        self.storage = Some(storage);
        self.rebuild()
    }

    /// Enable registration against a remote asset store.
    pub fn with_remote_store(mut self, store: Arc<dyn RemoteAssetStore>) -> Self {
        self.store = Some(store);
        self.rebuild()
    }

    fn rebuild(mut self) -> Self {
        let source = build_source(&self.config, &self.http, &self.resolver, self.storage.clone());
        let ttl = self.config.cache_ttl();
        self.registry = self
            .store
            .clone()
            .map(|store| AssetRegistry::new(source.clone(), self.cache.clone(), store, ttl));
        self.assembler = PartAssembler::new(source, self.cache.clone(), ttl);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// One part for `source_uri`, or `None` when the reference is unusable.
    pub async fn prepare_asset_part(&self, ctx: &RequestContext, source_uri: &str) -> Option<Part> {
        self.assembler.prepare(ctx, source_uri).await
    }

    /// The prompt text followed by a part per usable reference.
    pub async fn assemble_parts<S>(
        &self,
        ctx: &RequestContext,
        prompt: &str,
        source_uris: &[S],
    ) -> Vec<Part>
    where
        S: AsRef<str> + Sync,
    {
        self.assembler.assemble(ctx, prompt, source_uris).await
    }

    /// Register `source_uri` with the remote asset store.
    ///
    /// # Errors
    ///
    /// `RegistrationFailure` when no remote store is configured, plus every
    /// error [`AssetRegistry::register`] returns.
    #[instrument(skip(self, ctx))]
    pub async fn register_asset(&self, ctx: &RequestContext, source_uri: &str) -> AssetResult<String> {
        self.registry()?.register(ctx, source_uri).await
    }

    /// Delete the remote copy of `source_uri`.
    ///
    /// # Errors
    ///
    /// `RegistrationFailure` when no remote store is configured, plus every
    /// error [`AssetRegistry::unregister`] returns.
    #[instrument(skip(self, ctx))]
    pub async fn unregister_asset(&self, ctx: &RequestContext, source_uri: &str) -> AssetResult<()> {
        self.registry()?.unregister(ctx, source_uri).await
    }

    /// See [`crate::interpret_response`].
    pub fn interpret_response(
        &self,
        response: Option<&GenerationResponse>,
        requested_seed: i64,
    ) -> GenerationResult<ImageOutput> {
        crate::interpret_response(response, requested_seed)
    }

    fn registry(&self) -> AssetResult<&AssetRegistry> {
        self.registry.as_ref().ok_or_else(|| {
            AssetError::new(AssetErrorKind::RegistrationFailure(
                "no remote asset store configured".to_string(),
            ))
        })
    }
}

fn build_source(
    config: &PipelineConfig,
    http: &Arc<dyn HttpFetcher>,
    resolver: &Arc<dyn Resolver>,
    storage: Option<Arc<dyn ObjectStorage>>,
) -> AssetSource {
    let validator = UrlValidator::new(config.validator().clone(), Arc::clone(resolver));
    let mut fetcher = AssetFetcher::new(Arc::clone(http));
    if let Some(storage) = storage {
        fetcher = fetcher.with_object_storage(storage);
    }
    AssetSource::new(validator, fetcher, Compressor::new(*config.compression()))
}
