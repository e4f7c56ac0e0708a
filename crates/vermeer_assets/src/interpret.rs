//! Response interpretation.

use tracing::{debug, warn};
use vermeer_core::{CompletionStatus, GenerationResponse, ImageOutput};
use vermeer_error::{GenerationError, GenerationErrorKind, GenerationResult};

/// Extract the generated image from a response.
///
/// Only the first candidate is consulted. Its completion status is checked
/// before any content is read, so a halted candidate's partial output is never
/// returned. The first inline part with a non-empty payload wins, and
/// `requested_seed` is echoed unchanged.
///
/// # Errors
///
/// `EmptyResponse` when there is no payload, no candidate, or no image in the
/// first candidate; `GenerationHalted` carrying the raw finish reason when the
/// first candidate did not complete normally.
///
/// # Examples
///
/// ```
/// use vermeer_assets::interpret_response;
/// use vermeer_core::{
///     Candidate, Content, GenerationResponse, InlineData, RawResponse, ResponsePart,
/// };
///
/// let response = GenerationResponse::from_raw(RawResponse {
///     candidates: vec![Candidate {
///         finish_reason: Some("STOP".to_string()),
///         content: Some(Content {
///             parts: vec![ResponsePart {
///                 text: None,
///                 inline_data: Some(InlineData {
///                     mime_type: "image/jpeg".to_string(),
///                     data: vec![0xFF, 0xD8],
///                 }),
///             }],
///         }),
///     }],
///     prompt_feedback: None,
/// });
///
/// let output = interpret_response(Some(&response), 42).unwrap();
/// assert_eq!(output.data, vec![0xFF, 0xD8]);
/// assert_eq!(output.mime_type, "image/jpeg");
/// assert_eq!(output.used_seed, 42);
/// ```
pub fn interpret_response(
    response: Option<&GenerationResponse>,
    requested_seed: i64,
) -> GenerationResult<ImageOutput> {
    let raw = response
        .and_then(|r| r.raw.as_ref())
        .ok_or_else(|| empty("response carried no payload"))?;

    let Some(candidate) = raw.candidates.first() else {
        let block_reason = raw
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref());
        return Err(match block_reason {
            Some(reason) => {
                warn!(block_reason = reason, "Prompt was blocked");
                empty(format!("no candidates, prompt blocked: {}", reason))
            }
            None => empty("no candidates"),
        });
    };

    if raw.candidates.len() > 1 {
        debug!(
            candidates = raw.candidates.len(),
            "Ignoring all but the first candidate"
        );
    }

    if let CompletionStatus::Halted(reason) = candidate.status() {
        warn!(finish_reason = %reason, "Generation halted");
        return Err(GenerationError::new(GenerationErrorKind::GenerationHalted(
            reason,
        )));
    }

    candidate
        .content
        .iter()
        .flat_map(|content| content.parts.iter())
        .filter_map(|part| part.inline_data.as_ref())
        .find(|inline| !inline.data.is_empty())
        .map(|inline| ImageOutput {
            data: inline.data.clone(),
            mime_type: inline.mime_type.clone(),
            used_seed: requested_seed,
        })
        .ok_or_else(|| empty("no image produced"))
}

#[track_caller]
fn empty(message: impl Into<String>) -> GenerationError {
    GenerationError::new(GenerationErrorKind::EmptyResponse(message.into()))
}
