//! Core data types for the Vermeer image generation toolkit.
//!
//! This crate provides the data model shared by the asset pipeline, the cache,
//! and the remote client: reference classification, request parts, raw
//! responses, interpreted outputs, and per-request cancellation.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod output;
mod part;
mod reference;
mod remote;
mod request;
mod response;
mod seed;

pub use context::{CancelHandle, RequestContext};
pub use output::ImageOutput;
pub use part::{Part, RemoteHandle};
pub use reference::{AssetKind, AssetReference};
pub use remote::{RemoteAssetStore, RemoteGenerator, UploadedFile};
pub use request::{
    GenerateOptions, GenerateOptionsBuilder, ImageGenerationRequest,
    ImageGenerationRequestBuilder, ImagePageRequest, ImagePageRequestBuilder,
};
pub use response::{
    Candidate, CompletionStatus, Content, FINISH_REASON_STOP, FINISH_REASON_UNSPECIFIED,
    GenerationResponse, InlineData, PromptFeedback, RawResponse, ResponsePart,
};
pub use seed::{narrow_seed, requested_seed};
