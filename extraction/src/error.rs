//! Error taxonomy for the extraction protocol.
//!
//! Every failure mode of `evaluate` resolves into one of these variants; no
//! panic and no invoker error ever crosses the protocol's public boundary.
//! Terminal variants carry the last raw model text so callers can inspect
//! what the model actually produced.

use thiserror::Error;

use crate::invoker::InvokeError;

/// Failure of one parse-and-validate pass over a model response.
///
/// Both kinds are retry-eligible: "not JSON" and "JSON but wrong shape" are
/// the same failure class as far as the retry loop is concerned, but they are
/// kept distinct in logs and terminal errors.
#[derive(Debug, Clone, Error)]
pub enum AttemptError {
    /// The model returned empty text.
    #[error("empty response")]
    EmptyResponse,

    /// The response text could not be repaired into JSON.
    #[error("malformed JSON: {message}")]
    MalformedJson {
        /// Parse error detail.
        message: String,
    },

    /// The response parsed, but the schema validator rejected it.
    #[error("unexpected schema: {reason}")]
    SchemaViolation {
        /// Human-readable rejection reason from the validator.
        reason: String,
    },
}

/// Errors returned by [`crate::StructuredExtractor::evaluate`].
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The symbolic prompt name was not found in the store. No model call
    /// was made.
    #[error("prompt '{name}' not found in prompt store")]
    PromptMissing {
        /// The symbolic prompt name that was looked up.
        name: String,
    },

    /// Failure persisted after the configured retries were exhausted.
    #[error("no valid JSON after {attempts} attempt(s): {last_error}")]
    RetriesExhausted {
        /// Total invocations made (first attempt plus retries).
        attempts: usize,
        /// The failure from the final attempt.
        last_error: AttemptError,
        /// Raw model text from the final attempt.
        raw_text: String,
    },

    /// The invoker itself failed (network, auth, quota). Terminal; retrying
    /// the same call against a broken transport is not useful.
    #[error(transparent)]
    Transport(#[from] InvokeError),
}

impl ExtractionError {
    /// The raw model text attached to the error, when there is one.
    #[must_use]
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            Self::RetriesExhausted { raw_text, .. } => Some(raw_text),
            Self::PromptMissing { .. } | Self::Transport(_) => None,
        }
    }
}
