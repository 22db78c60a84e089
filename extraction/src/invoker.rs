//! The model invoker seam.
//!
//! The extraction protocol never talks to a model service directly; it goes
//! through [`ModelInvoker`], which accepts an ordered message list and returns
//! one text response. Production code plugs in an HTTP-backed client, tests
//! plug in a canned fake.

use async_trait::async_trait;
use thiserror::Error;

use crate::message::Message;

/// Transport-level failure raised by an invoker.
///
/// The protocol catches these at its top level; they never unwind through
/// `evaluate`.
#[derive(Debug, Clone, Error)]
#[error("model invocation failed: {0}")]
pub struct InvokeError(pub String);

impl InvokeError {
    /// Creates an invoke error from any displayable cause.
    pub fn new(cause: impl std::fmt::Display) -> Self {
        Self(cause.to_string())
    }
}

/// One model response.
///
/// Backends differ: some return the text payload directly, others return a
/// rich object whose content field carries it. Both shapes are accepted and
/// [`ModelResponse::text`] yields the payload either way.
#[derive(Debug, Clone)]
pub enum ModelResponse {
    /// A bare text payload.
    Plain(String),
    /// A rich response exposing a content field plus backend metadata.
    Rich {
        /// The text payload.
        content: String,
        /// Backend-reported model identifier, when available.
        model: Option<String>,
    },
}

impl ModelResponse {
    /// The text payload of the response.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) | Self::Rich { content: text, .. } => text,
        }
    }

    /// Consumes the response and returns the owned text payload.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Plain(text) | Self::Rich { content: text, .. } => text,
        }
    }
}

impl From<String> for ModelResponse {
    fn from(text: String) -> Self {
        Self::Plain(text)
    }
}

impl From<&str> for ModelResponse {
    fn from(text: &str) -> Self {
        Self::Plain(text.to_string())
    }
}

/// A single round-trip call to the underlying generation service.
///
/// Implementations may fail on transport or auth problems; the extraction
/// protocol converts those into a terminal [`crate::ExtractionError::Transport`].
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Sends the ordered message list and returns the model's response.
    async fn invoke(&self, messages: &[Message]) -> Result<ModelResponse, InvokeError>;
}
