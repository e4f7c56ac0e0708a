//! Conversions between core parts and Gemini wire types.

use super::dto::{
    GenerateContentRequest, GenerateContentResponse, GenerationConfig, ImageConfig, WireBlob,
    WireContent, WireFileData, WirePart,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use vermeer_core::{
    Candidate, Content, GenerateOptions, GenerationResponse, InlineData, Part, PromptFeedback,
    RawResponse, ResponsePart,
};
use vermeer_error::{RemoteError, RemoteErrorKind};

/// Modalities requested for image generation.
const RESPONSE_MODALITIES: [&str; 2] = ["TEXT", "IMAGE"];

/// Build a `generateContent` body from ordered parts.
///
/// Part order is preserved. A blank aspect ratio or system prompt is omitted.
pub fn to_generate_request(parts: &[Part], options: &GenerateOptions) -> GenerateContentRequest {
    let wire_parts = parts.iter().map(to_wire_part).collect();

    let system_instruction = options
        .system_prompt()
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| WireContent {
            role: None,
            parts: vec![WirePart {
                text: Some(s.to_string()),
                ..Default::default()
            }],
        });

    let image_config = options
        .aspect_ratio()
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| ImageConfig {
            aspect_ratio: s.to_string(),
        });

    GenerateContentRequest {
        contents: vec![WireContent {
            role: Some("user".to_string()),
            parts: wire_parts,
        }],
        system_instruction,
        generation_config: GenerationConfig {
            response_modalities: RESPONSE_MODALITIES.iter().map(|m| m.to_string()).collect(),
            seed: *options.seed(),
            image_config,
        },
    }
}

fn to_wire_part(part: &Part) -> WirePart {
    match part {
        Part::Text(text) => WirePart {
            text: Some(text.clone()),
            ..Default::default()
        },
        Part::InlineImage { mime_type, data } => WirePart {
            inline_data: Some(WireBlob {
                mime_type: mime_type.clone(),
                data: STANDARD.encode(data),
            }),
            ..Default::default()
        },
        Part::RemoteHandle { uri, mime_type } => WirePart {
            file_data: Some(WireFileData {
                mime_type: mime_type.clone(),
                file_uri: uri.clone(),
            }),
            ..Default::default()
        },
    }
}

/// Decode a `generateContent` body into the core response model.
///
/// # Errors
///
/// Returns `Base64Decode` if any inline payload is not valid base64.
pub fn from_generate_response(
    response: GenerateContentResponse,
) -> Result<GenerationResponse, RemoteError> {
    let mut text = String::new();
    let mut candidates = Vec::with_capacity(response.candidates.len());

    for (index, candidate) in response.candidates.into_iter().enumerate() {
        let content = match candidate.content {
            Some(content) => {
                let mut parts = Vec::with_capacity(content.parts.len());
                for part in content.parts {
                    if let (0, Some(t)) = (index, &part.text) {
                        text.push_str(t);
                    }
                    parts.push(from_wire_part(part)?);
                }
                Some(Content { parts })
            }
            None => None,
        };
        candidates.push(Candidate {
            finish_reason: candidate.finish_reason,
            content,
        });
    }

    let prompt_feedback = response.prompt_feedback.map(|f| PromptFeedback {
        block_reason: f.block_reason,
    });

    Ok(GenerationResponse {
        text: (!text.is_empty()).then_some(text),
        raw: Some(RawResponse {
            candidates,
            prompt_feedback,
        }),
    })
}

fn from_wire_part(part: WirePart) -> Result<ResponsePart, RemoteError> {
    let inline_data = part
        .inline_data
        .map(|blob| {
            STANDARD
                .decode(blob.data.as_bytes())
                .map(|data| InlineData {
                    mime_type: blob.mime_type,
                    data,
                })
                .map_err(|e| RemoteError::new(RemoteErrorKind::Base64Decode(e.to_string())))
        })
        .transpose()?;
    Ok(ResponsePart {
        text: part.text,
        inline_data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vermeer_core::GenerateOptionsBuilder;

    #[test]
    fn test_request_preserves_part_order_and_options() {
        let parts = vec![
            Part::Text("a cat".to_string()),
            Part::InlineImage {
                mime_type: "image/png".to_string(),
                data: vec![1, 2, 3],
            },
            Part::RemoteHandle {
                uri: "https://files/abc".to_string(),
                mime_type: Some("image/jpeg".to_string()),
            },
        ];
        let options = GenerateOptionsBuilder::default()
            .aspect_ratio("16:9")
            .system_prompt("be bold")
            .seed(-1)
            .build()
            .unwrap();

        let body = serde_json::to_value(to_generate_request(&parts, &options)).unwrap();

        let wire = &body["contents"][0]["parts"];
        assert_eq!(wire[0]["text"], "a cat");
        assert_eq!(wire[1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(wire[1]["inlineData"]["data"], "AQID");
        assert_eq!(wire[2]["fileData"]["fileUri"], "https://files/abc");
        assert_eq!(body["generationConfig"]["seed"], -1);
        assert_eq!(body["generationConfig"]["imageConfig"]["aspectRatio"], "16:9");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be bold");
    }

    #[test]
    fn test_request_omits_unset_options() {
        let body = serde_json::to_value(to_generate_request(
            &[Part::Text("x".to_string())],
            &GenerateOptions::default(),
        ))
        .unwrap();

        assert!(body.get("systemInstruction").is_none());
        assert!(body["generationConfig"].get("seed").is_none());
        assert!(body["generationConfig"].get("imageConfig").is_none());
        assert_eq!(
            body["generationConfig"]["responseModalities"],
            serde_json::json!(["TEXT", "IMAGE"])
        );
    }

    #[test]
    fn test_response_decodes_inline_images() {
        let json = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"text": "Here it is"},
                    {"inlineData": {"mimeType": "image/jpeg", "data": "/9g="}}
                ]},
                "finishReason": "STOP"
            }]
        }"#;
        let wire: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let response = from_generate_response(wire).unwrap();

        assert_eq!(response.text.as_deref(), Some("Here it is"));
        let raw = response.raw.unwrap();
        let candidate = &raw.candidates[0];
        assert_eq!(candidate.finish_reason.as_deref(), Some("STOP"));
        let parts = &candidate.content.as_ref().unwrap().parts;
        assert_eq!(
            parts[1].inline_data,
            Some(InlineData {
                mime_type: "image/jpeg".to_string(),
                data: vec![0xFF, 0xD8],
            })
        );
    }

    #[test]
    fn test_response_keeps_block_reason() {
        let json = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let wire: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let raw = from_generate_response(wire).unwrap().raw.unwrap();

        assert!(raw.candidates.is_empty());
        assert_eq!(
            raw.prompt_feedback.unwrap().block_reason.as_deref(),
            Some("SAFETY")
        );
    }

    #[test]
    fn test_invalid_base64_is_an_error() {
        let json = r#"{"candidates": [{"content": {"parts": [
            {"inlineData": {"mimeType": "image/png", "data": "***"}}
        ]}}]}"#;
        let wire: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let err = from_generate_response(wire).unwrap_err();
        assert!(matches!(err.kind, RemoteErrorKind::Base64Decode(_)));
    }
}
