//! Remote service integrations for Vermeer.
//!
//! [`GeminiClient`] implements both [`vermeer_core::RemoteGenerator`] and
//! [`vermeer_core::RemoteAssetStore`] against the Generative Language REST
//! API. Transient failures are retried with [`retry_with_backoff`].

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod gemini;
mod retry;

pub use gemini::{
    GeminiClient, GeminiConfig, GenerateContentRequest, GenerateContentResponse,
    from_generate_response, to_generate_request,
};
pub use retry::retry_with_backoff;
