//! Panel and page generation on top of the asset pipeline.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use vermeer_assets::AssetPipeline;
use vermeer_core::{
    GenerateOptions, GenerateOptionsBuilder, ImageGenerationRequest, ImageOutput,
    ImagePageRequest, Part, RemoteGenerator, RequestContext, narrow_seed, requested_seed,
};
use vermeer_error::{GenerationError, GenerationErrorKind, GenerationResult, VermeerResult};

/// Header placed between the prompt and the negative prompt.
pub const NEGATIVE_PROMPT_SEPARATOR: &str = "\n\n[Negative Prompt]\n";

/// A generated image returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResponse {
    /// Image bytes
    pub data: Vec<u8>,
    /// MIME type declared by the service
    pub mime_type: String,
    /// Seed the caller requested, 0 when none
    pub used_seed: i64,
}

impl From<ImageOutput> for ImageResponse {
    fn from(output: ImageOutput) -> Self {
        Self {
            data: output.data,
            mime_type: output.mime_type,
            used_seed: output.used_seed,
        }
    }
}

/// Append the negative prompt under its header when it is not blank.
///
/// # Examples
///
/// ```
/// use vermeer::build_final_prompt;
///
/// assert_eq!(build_final_prompt("a cat", None), "a cat");
/// assert_eq!(build_final_prompt("a cat", Some("  ")), "a cat");
/// assert_eq!(
///     build_final_prompt("a cat", Some("dogs")),
///     "a cat\n\n[Negative Prompt]\ndogs"
/// );
/// ```
pub fn build_final_prompt(prompt: &str, negative_prompt: Option<&str>) -> String {
    match negative_prompt {
        Some(negative) if !negative.trim().is_empty() => {
            format!("{}{}{}", prompt, NEGATIVE_PROMPT_SEPARATOR, negative)
        }
        _ => prompt.to_string(),
    }
}

/// A single generation: one panel or a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationJob {
    /// At most one reference image
    Panel(ImageGenerationRequest),
    /// Any number of reference images
    Page(ImagePageRequest),
}

impl GenerationJob {
    /// The job's reference URIs in request order.
    pub fn reference_uris(&self) -> &[String] {
        match self {
            GenerationJob::Panel(request) => request.reference_uri().as_slice(),
            GenerationJob::Page(request) => request.reference_uris().as_slice(),
        }
    }
}

impl From<ImageGenerationRequest> for GenerationJob {
    fn from(request: ImageGenerationRequest) -> Self {
        GenerationJob::Panel(request)
    }
}

impl From<ImagePageRequest> for GenerationJob {
    fn from(request: ImagePageRequest) -> Self {
        GenerationJob::Page(request)
    }
}

/// Generates images from a prompt plus reference images.
///
/// References that cannot be used are dropped; the request still goes out
/// with the text and whatever images survived.
#[derive(Clone)]
pub struct ImageGenerator {
    pipeline: AssetPipeline,
    remote: Arc<dyn RemoteGenerator>,
    model: String,
}

impl std::fmt::Debug for ImageGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageGenerator")
            .field("pipeline", &self.pipeline)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl ImageGenerator {
    /// Create a generator that calls `model` through `remote`.
    pub fn new(
        pipeline: AssetPipeline,
        remote: Arc<dyn RemoteGenerator>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            pipeline,
            remote,
            model: model.into(),
        }
    }

    /// The asset pipeline, for registration calls.
    pub fn pipeline(&self) -> &AssetPipeline {
        &self.pipeline
    }

    /// The model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate a single panel with at most one reference image.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call fails, is interrupted, or the
    /// response carries no usable image.
    #[instrument(skip(self, ctx, request), fields(model = %self.model, has_reference = request.reference_uri().is_some()))]
    pub async fn generate_panel(
        &self,
        ctx: &RequestContext,
        request: &ImageGenerationRequest,
    ) -> GenerationResult<ImageResponse> {
        let prompt = build_final_prompt(request.prompt(), request.negative_prompt().as_deref());
        let parts = self
            .pipeline
            .assemble_parts(ctx, &prompt, request.reference_uri().as_slice())
            .await;
        let options = build_options(
            request.aspect_ratio().as_deref(),
            request.system_prompt().as_deref(),
            *request.seed(),
        );
        self.generate(ctx, &parts, &options, requested_seed(*request.seed()))
            .await
    }

    /// Generate a page from any number of reference images.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call fails, is interrupted, or the
    /// response carries no usable image.
    #[instrument(skip(self, ctx, request), fields(model = %self.model, references = request.reference_uris().len()))]
    pub async fn generate_page(
        &self,
        ctx: &RequestContext,
        request: &ImagePageRequest,
    ) -> GenerationResult<ImageResponse> {
        let prompt = build_final_prompt(request.prompt(), request.negative_prompt().as_deref());
        let parts = self
            .pipeline
            .assemble_parts(ctx, &prompt, request.reference_uris().as_slice())
            .await;
        let options = build_options(
            request.aspect_ratio().as_deref(),
            request.system_prompt().as_deref(),
            *request.seed(),
        );
        self.generate(ctx, &parts, &options, requested_seed(*request.seed()))
            .await
    }

    /// Run a panel or page job.
    ///
    /// # Errors
    ///
    /// As for [`Self::generate_panel`] and [`Self::generate_page`].
    pub async fn generate_job(
        &self,
        ctx: &RequestContext,
        job: &GenerationJob,
    ) -> GenerationResult<ImageResponse> {
        match job {
            GenerationJob::Panel(request) => self.generate_panel(ctx, request).await,
            GenerationJob::Page(request) => self.generate_page(ctx, request).await,
        }
    }

    /// Run `job` with its references uploaded to the remote asset store.
    ///
    /// A reference that cannot be uploaded is logged and left to the inline
    /// path, where it is used or dropped as usual. Every upload that succeeded
    /// is deleted afterwards whatever the outcome of the generation. Cleanup
    /// uses a fresh context so a cancelled or expired `ctx` does not leave
    /// files behind.
    ///
    /// # Errors
    ///
    /// The generation error, if any. Upload and cleanup failures are logged.
    #[instrument(skip(self, ctx, job), fields(model = %self.model, references = job.reference_uris().len()))]
    pub async fn generate_with_uploads(
        &self,
        ctx: &RequestContext,
        job: &GenerationJob,
    ) -> VermeerResult<ImageResponse> {
        let mut registered: Vec<&str> = Vec::new();
        for uri in job.reference_uris() {
            if registered.contains(&uri.as_str()) {
                continue;
            }
            match self.pipeline.register_asset(ctx, uri).await {
                Ok(handle) => {
                    info!(source_uri = %uri, handle = %handle, "Reference uploaded");
                    registered.push(uri);
                }
                Err(e) => warn!(source_uri = %uri, error = %e, "Upload failed, reference left inline"),
            }
        }

        let result = self.generate_job(ctx, job).await;

        let cleanup = RequestContext::new();
        for uri in registered {
            if let Err(e) = self.pipeline.unregister_asset(&cleanup, uri).await {
                warn!(source_uri = %uri, error = %e, "Failed to remove uploaded reference");
            }
        }

        result.map_err(Into::into)
    }

    async fn generate(
        &self,
        ctx: &RequestContext,
        parts: &[Part],
        options: &GenerateOptions,
        seed: i64,
    ) -> GenerationResult<ImageResponse> {
        let images = parts.iter().filter(|p| p.is_image()).count();
        info!(images, "Sending generation request");

        let response = ctx
            .run(self.remote.generate(&self.model, parts, options))
            .await?
            .map_err(|e| {
                error!(error = %e, "Generation call failed");
                GenerationError::new(GenerationErrorKind::Remote(e.to_string()))
            })?;

        let output = self.pipeline.interpret_response(Some(&response), seed)?;
        info!(mime_type = %output.mime_type, bytes = output.data.len(), "Image generated");
        Ok(output.into())
    }
}

fn build_options(
    aspect_ratio: Option<&str>,
    system_prompt: Option<&str>,
    seed: Option<i64>,
) -> GenerateOptions {
    let mut builder = GenerateOptionsBuilder::default();
    if let Some(aspect_ratio) = aspect_ratio.filter(|s| !s.trim().is_empty()) {
        builder = builder.aspect_ratio(aspect_ratio);
    }
    if let Some(system_prompt) = system_prompt.filter(|s| !s.trim().is_empty()) {
        builder = builder.system_prompt(system_prompt);
    }
    if let Some(seed) = narrow_seed(seed) {
        builder = builder.seed(seed);
    }
    builder.build().unwrap_or_default()
}
