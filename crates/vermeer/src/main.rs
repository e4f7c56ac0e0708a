//! Vermeer command-line interface.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use vermeer::observability::{LogFormat, init_tracing};
use vermeer::{
    AssetPipeline, GeminiClient, GenerationJob, ImageGenerationRequestBuilder, ImageGenerator,
    ImagePageRequestBuilder, MemoryCache, ReqwestFetcher, RequestContext, VermeerConfig,
    VermeerResult,
};

/// Reference-guided image generation.
#[derive(Parser, Debug)]
#[command(name = "vermeer")]
#[command(about = "Generate images from a prompt and reference images")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "vermeer.toml", env = "VERMEER_CONFIG")]
    config: PathBuf,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Overall deadline in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate one image
    Generate {
        /// Instruction text
        #[arg(short, long)]
        prompt: String,

        /// Things the image should avoid
        #[arg(short, long)]
        negative_prompt: Option<String>,

        /// Reference image URI, repeatable
        #[arg(short = 'r', long = "ref")]
        references: Vec<String>,

        /// Seed for reproducible output
        #[arg(short, long)]
        seed: Option<i64>,

        /// Aspect ratio such as 16:9
        #[arg(short, long)]
        aspect_ratio: Option<String>,

        /// System instruction
        #[arg(long)]
        system_prompt: Option<String>,

        /// Upload references to the remote file store instead of inlining them
        #[arg(long)]
        upload: bool,

        /// Output file
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Upload reference images and print their handle URIs
    Register {
        /// Reference image URIs
        #[arg(required = true)]
        uris: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing(format)?;

    let config = VermeerConfig::load_or_default(&cli.config)?;
    info!(config_file = ?cli.config, model = %config.gemini().model(), "Configuration loaded");

    let cache = Arc::new(MemoryCache::new(config.memory_cache_config()));
    let http = Arc::new(ReqwestFetcher::new(config.fetch())?);
    let gemini = Arc::new(GeminiClient::from_env(config.gemini())?);
    let pipeline =
        AssetPipeline::new(config.pipeline_config(), cache, http).with_remote_store(gemini.clone());
    let generator = ImageGenerator::new(pipeline, gemini, config.gemini().model().clone());

    let ctx = match cli.timeout_secs {
        Some(secs) => RequestContext::new().with_timeout(Duration::from_secs(secs)),
        None => RequestContext::new(),
    };

    match cli.command {
        Commands::Generate {
            prompt,
            negative_prompt,
            references,
            seed,
            aspect_ratio,
            system_prompt,
            upload,
            out,
        } => {
            let job: GenerationJob = if references.len() <= 1 {
                let mut builder = ImageGenerationRequestBuilder::default().prompt(prompt);
                if let Some(uri) = references.into_iter().next() {
                    builder = builder.reference_uri(uri);
                }
                if let Some(negative) = negative_prompt {
                    builder = builder.negative_prompt(negative);
                }
                if let Some(seed) = seed {
                    builder = builder.seed(seed);
                }
                if let Some(aspect_ratio) = aspect_ratio {
                    builder = builder.aspect_ratio(aspect_ratio);
                }
                if let Some(system_prompt) = system_prompt {
                    builder = builder.system_prompt(system_prompt);
                }
                builder.build()?.into()
            } else {
                let mut builder = ImagePageRequestBuilder::default()
                    .prompt(prompt)
                    .reference_uris(references);
                if let Some(negative) = negative_prompt {
                    builder = builder.negative_prompt(negative);
                }
                if let Some(seed) = seed {
                    builder = builder.seed(seed);
                }
                if let Some(aspect_ratio) = aspect_ratio {
                    builder = builder.aspect_ratio(aspect_ratio);
                }
                if let Some(system_prompt) = system_prompt {
                    builder = builder.system_prompt(system_prompt);
                }
                builder.build()?.into()
            };

            let result: VermeerResult<_> = if upload {
                generator.generate_with_uploads(&ctx, &job).await
            } else {
                generator.generate_job(&ctx, &job).await.map_err(Into::into)
            };

            let image = result?;
            std::fs::write(&out, &image.data)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            println!(
                "{} ({}, {} bytes, seed {})",
                out.display(),
                image.mime_type,
                image.data.len(),
                image.used_seed
            );
        }
        Commands::Register { uris } => {
            for uri in uris {
                let handle = generator.pipeline().register_asset(&ctx, &uri).await?;
                println!("{}\t{}", uri, handle);
            }
        }
    }

    Ok(())
}
