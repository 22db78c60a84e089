//! Error types for Gemini API calls.

use siniestro_extraction::InvokeError;
use thiserror::Error;

/// Errors raised by a `generateContent` round-trip.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// The HTTP request itself failed (connect, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status.
    #[error("Gemini API error (status {status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnosis.
        body: String,
    },

    /// The prompt was blocked by safety filtering.
    #[error("prompt blocked by the API: {0}")]
    BlockedPrompt(String),

    /// The response carried no candidates or no text parts.
    #[error("response contained no text candidates")]
    EmptyCandidates,
}

impl From<GeminiError> for InvokeError {
    fn from(err: GeminiError) -> Self {
        Self::new(err)
    }
}
