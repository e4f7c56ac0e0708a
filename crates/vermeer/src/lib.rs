//! Reference-guided image generation.
//!
//! Vermeer prepares multimodal requests for a remote image model from a text
//! prompt plus reference images, and interprets what comes back. Reference
//! URLs are checked against internal network targets before anything is
//! fetched, fetched bytes and remote registrations are cached, and one bad
//! reference never fails a request.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vermeer::{
//!     AssetPipeline, GeminiClient, ImageGenerationRequestBuilder, ImageGenerator, MemoryCache,
//!     ReqwestFetcher, RequestContext, VermeerConfig,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = VermeerConfig::default();
//! let cache = Arc::new(MemoryCache::new(config.memory_cache_config()));
//! let http = Arc::new(ReqwestFetcher::new(config.fetch())?);
//! let gemini = Arc::new(GeminiClient::from_env(config.gemini())?);
//!
//! let pipeline = AssetPipeline::new(config.pipeline_config(), cache, http)
//!     .with_remote_store(gemini.clone());
//! let generator = ImageGenerator::new(pipeline, gemini, config.gemini().model().clone());
//!
//! let request = ImageGenerationRequestBuilder::default()
//!     .prompt("A lighthouse in a storm, ink wash")
//!     .reference_uri("https://example.com/style.png")
//!     .seed(42)
//!     .build()?;
//! let image = generator.generate_panel(&RequestContext::new(), &request).await?;
//! std::fs::write("panel.png", &image.data)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod generator;
pub mod observability;

pub use config::{CacheSettings, VermeerConfig};
pub use generator::{
    GenerationJob, ImageGenerator, ImageResponse, NEGATIVE_PROMPT_SEPARATOR, build_final_prompt,
};

pub use vermeer_assets::{
    AssetPipeline, CompressionConfig, FetchConfig, HttpFetcher, ObjectStorage, PipelineConfig,
    ReqwestFetcher, Resolver, ValidatorConfig, interpret_response, sniff_mime,
};
pub use vermeer_cache::{AssetCache, MemoryCache, MemoryCacheConfig};
pub use vermeer_core::{
    GenerateOptions, ImageGenerationRequest, ImageGenerationRequestBuilder, ImageOutput,
    ImagePageRequest, ImagePageRequestBuilder, Part, RemoteAssetStore, RemoteGenerator,
    RequestContext,
};
pub use vermeer_error::{
    AssetError, AssetErrorKind, GenerationError, GenerationErrorKind, VermeerError,
    VermeerErrorKind, VermeerResult,
};
pub use vermeer_models::{GeminiClient, GeminiConfig};
