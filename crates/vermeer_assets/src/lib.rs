//! Reference image acquisition for generation requests.
//!
//! Turns caller-supplied image references into request parts and interprets
//! what the remote service sends back:
//!
//! - [`UrlValidator`] rejects references that resolve to internal networks.
//! - [`AssetFetcher`] reads bytes over HTTP or from object storage.
//! - [`Compressor`] optionally re-encodes images as JPEG.
//! - [`PartAssembler`] builds parts best-effort, preferring cached work.
//! - [`AssetRegistry`] uploads and deletes remote copies.
//! - [`interpret_response`] extracts the generated image.
//!
//! [`AssetPipeline`] wires these together around a shared cache.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod acquire;
mod assembler;
mod compress;
mod config;
mod fetcher;
mod interpret;
mod pipeline;
mod registry;
mod sniff;
mod validator;

pub use acquire::{Acquired, AssetSource};
pub use assembler::PartAssembler;
pub use compress::{Compressor, compress_to_jpeg};
pub use config::{CompressionConfig, FetchConfig, PipelineConfig, ValidatorConfig};
pub use fetcher::{AssetFetcher, HttpFetcher, ObjectReader, ObjectStorage, ReqwestFetcher};
pub use interpret::interpret_response;
pub use pipeline::AssetPipeline;
pub use registry::AssetRegistry;
pub use sniff::{OCTET_STREAM, is_image_mime, sniff_mime};
pub use validator::{Resolver, SystemResolver, UrlValidator, is_restricted};
