//! Gemini Generative Language API.

mod client;
mod config;
mod conversions;
mod dto;

pub use client::GeminiClient;
pub use config::GeminiConfig;
pub use conversions::{from_generate_response, to_generate_request};
pub use dto::{GenerateContentRequest, GenerateContentResponse};
