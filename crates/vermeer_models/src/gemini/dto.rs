//! Wire types for the Generative Language REST API.

use serde::{Deserialize, Serialize};

/// Body of a `models/{model}:generateContent` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation turns; a single user turn here
    pub contents: Vec<WireContent>,
    /// System instruction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<WireContent>,
    /// Output settings
    pub generation_config: GenerationConfig,
}

/// One turn of content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireContent {
    /// Author role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Ordered parts
    #[serde(default)]
    pub parts: Vec<WirePart>,
}

/// A single part; exactly one field is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePart {
    /// Text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Base64 bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<WireBlob>,
    /// Reference to an uploaded file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_data: Option<WireFileData>,
}

/// Inline bytes, base64 encoded on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireBlob {
    /// MIME type
    pub mime_type: String,
    /// Base64 payload
    pub data: String,
}

/// Reference to a file uploaded through the Files API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireFileData {
    /// MIME type of the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// File URI returned by the upload
    pub file_uri: String,
}

/// `generationConfig` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Requested output modalities
    pub response_modalities: Vec<String>,
    /// Sampling seed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i32>,
    /// Image output settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

/// `imageConfig` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    /// Aspect ratio such as `16:9`
    pub aspect_ratio: String,
}

/// Body returned by `generateContent`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidates, best first
    #[serde(default)]
    pub candidates: Vec<WireCandidate>,
    /// Feedback about the prompt
    #[serde(default)]
    pub prompt_feedback: Option<WirePromptFeedback>,
}

/// One candidate.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCandidate {
    /// Generated content
    #[serde(default)]
    pub content: Option<WireContent>,
    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Prompt-level feedback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePromptFeedback {
    /// Why the prompt was blocked
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Metadata sent when starting a resumable upload.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct UploadStartRequest<'a> {
    pub file: UploadFileMetadata<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct UploadFileMetadata<'a> {
    pub display_name: &'a str,
}

/// Body returned when an upload is finalized.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UploadResponse {
    pub file: RemoteFile,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RemoteFile {
    pub name: String,
    pub uri: String,
}

/// Error envelope used by the API.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}
