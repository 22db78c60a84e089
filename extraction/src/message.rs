//! Role-tagged messages sent to the model invoker.
//!
//! A message is a role plus an ordered list of content blocks. Blocks are
//! either text or opaque binary media with a MIME type; no codec logic lives
//! here. Messages are immutable values - every model call builds a fresh list.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Message role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Task instructions and output-format rules.
    System,
    /// Task content: text and/or media.
    User,
}

/// One block of message content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text.
    Text {
        /// The text content.
        text: String,
    },
    /// Opaque binary media (image, PDF page, audio).
    Media {
        /// Raw bytes, base64-encoded when serialized.
        #[serde(
            serialize_with = "serialize_base64",
            deserialize_with = "deserialize_base64"
        )]
        data: Vec<u8>,
        /// MIME type of the payload (e.g. `image/jpeg`, `audio/mpeg`).
        mime_type: String,
    },
}

impl ContentBlock {
    /// Creates a text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Creates a media block from raw bytes and a MIME type.
    pub fn media(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self::Media {
            data,
            mime_type: mime_type.into(),
        }
    }
}

fn serialize_base64<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&BASE64.encode(data))
}

fn deserialize_base64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let encoded = String::deserialize(deserializer)?;
    BASE64.decode(encoded).map_err(serde::de::Error::custom)
}

/// A role-tagged message with ordered content blocks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Who the message speaks as.
    pub role: Role,
    /// Ordered content blocks.
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// Creates a system message with a single text block.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: vec![ContentBlock::text(text)],
        }
    }

    /// Creates a user message from pre-built content blocks.
    #[must_use]
    pub const fn user(content: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::User,
            content,
        }
    }

    /// Creates a user message with a single text block.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::user(vec![ContentBlock::text(text)])
    }

    /// Concatenated text of all text blocks, ignoring media.
    #[must_use]
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Media { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_text_builds_single_text_block() {
        let msg = Message::user_text("hola");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, vec![ContentBlock::text("hola")]);
    }

    #[test]
    fn text_content_skips_media_blocks() {
        let msg = Message::user(vec![
            ContentBlock::text("before"),
            ContentBlock::media(vec![0xFF, 0xD8], "image/jpeg"),
            ContentBlock::text("after"),
        ]);
        assert_eq!(msg.text_content(), "before\nafter");
    }

    #[test]
    fn media_serializes_as_base64() {
        let block = ContentBlock::media(vec![1, 2, 3], "application/pdf");
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "media");
        assert_eq!(json["mime_type"], "application/pdf");
        assert_eq!(json["data"], "AQID");

        let back: ContentBlock = serde_json::from_value(json).unwrap();
        assert_eq!(back, block);
    }
}
