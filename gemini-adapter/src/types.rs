//! Structs mirroring the Gemini `generateContent` wire format.
//!
//! Request side covers text and inline binary parts plus the system
//! instruction; response side covers candidates and prompt feedback. Fields
//! this pipeline never reads are left out.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use siniestro_extraction::{ContentBlock, Message, Role};

/// Top-level `generateContent` request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation contents (user turns).
    pub contents: Vec<RequestContent>,
    /// System-level instructions, kept out of the user turns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<SystemInstruction>,
    /// Optional generation configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// System instruction wrapper.
#[derive(Debug, Serialize)]
pub struct SystemInstruction {
    /// Instruction parts (text only).
    pub parts: Vec<RequestPart>,
}

/// One content entry in a request.
#[derive(Debug, Serialize)]
pub struct RequestContent {
    /// Content role (`"user"`).
    pub role: String,
    /// Ordered parts: text and/or inline media.
    pub parts: Vec<RequestPart>,
}

/// A single request part.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestPart {
    /// Plain text part.
    #[serde(rename = "text")]
    Text(String),
    /// Inline binary media part.
    #[serde(rename = "inlineData")]
    InlineData(InlineData),
}

/// Base64-encoded media payload with its MIME type.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type (e.g. `image/jpeg`, `application/pdf`, `audio/mpeg`).
    pub mime_type: String,
    /// Base64-encoded bytes.
    pub data: String,
}

/// Generation configuration for requests.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// MIME type to force for the response (e.g. `application/json`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

/// Top-level `generateContent` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidate responses from the model.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Feedback about the prompt (set when it was blocked).
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// A single candidate response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The candidate's content.
    pub content: Option<ResponseContent>,
    /// Why the model stopped generating.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Content of a candidate.
#[derive(Debug, Deserialize)]
pub struct ResponseContent {
    /// Ordered content parts.
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// A single response part; only text parts are consumed.
#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    /// Text payload of this part, when present.
    #[serde(default)]
    pub text: Option<String>,
}

/// Feedback about a blocked prompt.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Reason the prompt was blocked, when it was.
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Builds the wire request from an ordered message list.
///
/// System messages are concatenated into the system instruction; user
/// messages become `contents` entries, with media blocks base64-encoded as
/// inline data.
#[must_use]
pub fn request_from_messages(
    messages: &[Message],
    generation_config: Option<GenerationConfig>,
) -> GenerateContentRequest {
    let mut system_parts = Vec::new();
    let mut contents = Vec::new();

    for message in messages {
        match message.role {
            Role::System => {
                system_parts.push(RequestPart::Text(message.text_content()));
            }
            Role::User => {
                let parts = message
                    .content
                    .iter()
                    .map(|block| match block {
                        ContentBlock::Text { text } => RequestPart::Text(text.clone()),
                        ContentBlock::Media { data, mime_type } => {
                            RequestPart::InlineData(InlineData {
                                mime_type: mime_type.clone(),
                                data: BASE64.encode(data),
                            })
                        }
                    })
                    .collect();
                contents.push(RequestContent {
                    role: "user".to_string(),
                    parts,
                });
            }
        }
    }

    GenerateContentRequest {
        contents,
        system_instruction: if system_parts.is_empty() {
            None
        } else {
            Some(SystemInstruction {
                parts: system_parts,
            })
        },
        generation_config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siniestro_extraction::ContentBlock;

    #[test]
    fn messages_map_onto_the_wire_shape() {
        let messages = vec![
            Message::system("Analiza el siniestro."),
            Message::user(vec![
                ContentBlock::text("Imágenes del caso:"),
                ContentBlock::media(vec![0xFF, 0xD8, 0xFF], "image/jpeg"),
            ]),
        ];

        let request = request_from_messages(&messages, None);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json["systemInstruction"]["parts"][0]["text"],
            "Analiza el siniestro."
        );
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Imágenes del caso:");
        let inline = &json["contents"][0]["parts"][1]["inlineData"];
        assert_eq!(inline["mimeType"], "image/jpeg");
        assert_eq!(inline["data"], "/9j/");
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn response_deserializes_candidate_text() {
        let body = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "{\"a\": 1}"}], "role": "model"},
                "finishReason": "STOP"
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        let text = response.candidates[0]
            .content
            .as_ref()
            .unwrap()
            .parts[0]
            .text
            .as_deref();
        assert_eq!(text, Some("{\"a\": 1}"));
    }

    #[test]
    fn blocked_prompt_feedback_deserializes() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert!(response.candidates.is_empty());
        assert_eq!(
            response.prompt_feedback.unwrap().block_reason.as_deref(),
            Some("SAFETY")
        );
    }
}
