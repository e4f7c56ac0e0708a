//! Raw responses from the remote generative service.
//!
//! These types carry only the fields the response interpreter reads. Wire
//! decoding lives with the concrete client.

use serde::{Deserialize, Serialize};

/// Finish reason the remote service reports for normal completion.
pub const FINISH_REASON_STOP: &str = "STOP";

/// Finish reason the remote service reports when it did not set one.
pub const FINISH_REASON_UNSPECIFIED: &str = "FINISH_REASON_UNSPECIFIED";

/// Wrapper returned by a generation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Concatenated text, when the client extracted any
    pub text: Option<String>,
    /// The undigested candidate payload
    pub raw: Option<RawResponse>,
}

impl GenerationResponse {
    /// Wrap a raw payload.
    pub fn from_raw(raw: RawResponse) -> Self {
        Self {
            text: None,
            raw: Some(raw),
        }
    }
}

/// Candidate list plus prompt-level feedback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResponse {
    /// Generated candidates, best first
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Feedback about the prompt itself
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// Why the prompt as a whole was refused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptFeedback {
    /// Block reason code, e.g. `SAFETY`
    pub block_reason: Option<String>,
}

/// One generated candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Raw completion status string
    pub finish_reason: Option<String>,
    /// Generated content
    pub content: Option<Content>,
}

impl Candidate {
    /// Classify the completion status.
    pub fn status(&self) -> CompletionStatus {
        CompletionStatus::classify(self.finish_reason.as_deref())
    }
}

/// Ordered parts of a candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Parts in the order the service produced them
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// A single response part; at most one field is normally set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponsePart {
    /// Text content
    pub text: Option<String>,
    /// Embedded bytes
    pub inline_data: Option<InlineData>,
}

/// Bytes embedded in a response part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineData {
    /// MIME type declared by the service
    pub mime_type: String,
    /// Decoded bytes
    pub data: Vec<u8>,
}

/// Completion status of a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CompletionStatus {
    /// Normal completion
    #[display("STOP")]
    Stop,
    /// The service did not report a reason
    #[display("FINISH_REASON_UNSPECIFIED")]
    Unspecified,
    /// Any other reason, carried verbatim
    #[display("{}", _0)]
    Halted(String),
}

impl CompletionStatus {
    /// Classify a raw finish reason string.
    ///
    /// A missing or blank reason counts as unspecified.
    ///
    /// # Examples
    ///
    /// ```
    /// use vermeer_core::CompletionStatus;
    ///
    /// assert_eq!(CompletionStatus::classify(Some("STOP")), CompletionStatus::Stop);
    /// assert_eq!(CompletionStatus::classify(None), CompletionStatus::Unspecified);
    /// assert_eq!(
    ///     CompletionStatus::classify(Some("SAFETY")),
    ///     CompletionStatus::Halted("SAFETY".to_string())
    /// );
    /// ```
    pub fn classify(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => CompletionStatus::Unspecified,
            Some(reason) if reason.eq_ignore_ascii_case(FINISH_REASON_STOP) => {
                CompletionStatus::Stop
            }
            Some(reason)
                if reason.eq_ignore_ascii_case(FINISH_REASON_UNSPECIFIED)
                    || reason.eq_ignore_ascii_case("UNSPECIFIED") =>
            {
                CompletionStatus::Unspecified
            }
            Some(reason) => CompletionStatus::Halted(reason.to_string()),
        }
    }

    /// Whether content from this candidate may be used.
    pub fn is_completed(&self) -> bool {
        !matches!(self, CompletionStatus::Halted(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_case_insensitive() {
        assert_eq!(CompletionStatus::classify(Some("stop")), CompletionStatus::Stop);
        assert_eq!(
            CompletionStatus::classify(Some("finish_reason_unspecified")),
            CompletionStatus::Unspecified
        );
        assert_eq!(CompletionStatus::classify(Some("  ")), CompletionStatus::Unspecified);
    }

    #[test]
    fn test_halted_keeps_raw_reason() {
        let status = CompletionStatus::classify(Some("IMAGE_SAFETY"));
        assert!(!status.is_completed());
        assert_eq!(status.to_string(), "IMAGE_SAFETY");
    }

    #[test]
    fn test_candidate_status() {
        let candidate = Candidate {
            finish_reason: Some("MAX_TOKENS".to_string()),
            content: None,
        };
        assert_eq!(candidate.status(), CompletionStatus::Halted("MAX_TOKENS".to_string()));
    }
}
