//! Generation request types.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Options forwarded to the remote generation call.
///
/// # Examples
///
/// ```
/// use vermeer_core::GenerateOptionsBuilder;
///
/// let options = GenerateOptionsBuilder::default()
///     .aspect_ratio("16:9")
///     .seed(7)
///     .build()
///     .unwrap();
/// assert_eq!(options.aspect_ratio().as_deref(), Some("16:9"));
/// assert_eq!(*options.seed(), Some(7));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Builder, Getters)]
#[builder(pattern = "owned", setter(into, strip_option), default)]
pub struct GenerateOptions {
    /// Output aspect ratio, e.g. "1:1"
    aspect_ratio: Option<String>,
    /// System instruction
    system_prompt: Option<String>,
    /// Narrowed seed
    seed: Option<i32>,
}

/// Request for a single image with at most one reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Builder, Getters)]
#[builder(pattern = "owned", setter(into, strip_option), default)]
pub struct ImageGenerationRequest {
    /// Instruction text
    prompt: String,
    /// Things the image should avoid
    negative_prompt: Option<String>,
    /// Output aspect ratio
    aspect_ratio: Option<String>,
    /// System instruction
    system_prompt: Option<String>,
    /// Reference image URI
    reference_uri: Option<String>,
    /// Requested seed at full width
    seed: Option<i64>,
}

/// Request for a single image built from many references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Builder, Getters)]
#[builder(pattern = "owned", setter(into, strip_option), default)]
pub struct ImagePageRequest {
    /// Instruction text
    prompt: String,
    /// Things the image should avoid
    negative_prompt: Option<String>,
    /// Output aspect ratio
    aspect_ratio: Option<String>,
    /// System instruction
    system_prompt: Option<String>,
    /// Reference image URIs in caller order
    reference_uris: Vec<String>,
    /// Requested seed at full width
    seed: Option<i64>,
}
