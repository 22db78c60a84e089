//! Repair parsing of model-returned text into JSON values.
//!
//! Models wrap JSON in markdown fences, prepend prose, or trail commentary
//! after the closing brace. [`extract_json`] tolerates the common noise with
//! a strict fallback order and communicates every failure through its return
//! value - it never panics.

use serde_json::Value;
use thiserror::Error;

/// Why a piece of text could not be repaired into JSON.
#[derive(Debug, Clone, Error)]
pub enum RepairError {
    /// The input was empty or whitespace-only; no parsing was attempted.
    #[error("empty response")]
    EmptyResponse,

    /// All repair attempts failed. The message is the parse error from the
    /// final brace-slice attempt when one was made.
    #[error("could not parse JSON after repairs: {message}")]
    Unparseable {
        /// Parse error detail from the last attempt.
        message: String,
    },
}

/// Extracts a JSON value from arbitrary model output text.
///
/// Attempts, in order, stopping at the first success:
///
/// 1. Parse the text verbatim.
/// 2. Strip a single leading/trailing markdown code fence and parse.
/// 3. Slice from the first `{` to the last `}` of the fence-stripped text
///    (inclusive) and parse; a parse error here becomes the returned error.
///
/// # Errors
///
/// Returns [`RepairError::EmptyResponse`] for empty input and
/// [`RepairError::Unparseable`] when every attempt fails.
pub fn extract_json(text: &str) -> Result<Value, RepairError> {
    if text.trim().is_empty() {
        return Err(RepairError::EmptyResponse);
    }

    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Ok(value);
    }

    let stripped = strip_code_fences(text);
    if let Ok(value) = serde_json::from_str::<Value>(stripped) {
        return Ok(value);
    }

    let start = stripped.find('{');
    let end = stripped.rfind('}');
    if let (Some(start), Some(end)) = (start, end) {
        if end > start {
            let candidate = &stripped[start..=end];
            return serde_json::from_str::<Value>(candidate).map_err(|e| {
                RepairError::Unparseable {
                    message: e.to_string(),
                }
            });
        }
    }

    Err(RepairError::Unparseable {
        message: "no JSON object found in response".to_string(),
    })
}

/// Strips one leading and one trailing triple-backtick fence, if present.
///
/// The leading fence may carry a language tag (```` ```json ````); only a
/// fence at the very start of the trimmed text is removed, and only one
/// trailing ```` ``` ```` marker at the end.
#[must_use]
pub fn strip_code_fences(text: &str) -> &str {
    let mut t = text.trim();
    if t.starts_with("```") {
        // Drop the whole fence line, language tag included. A fence with no
        // newline after it stays untouched for the brace slice to handle.
        t = t.find('\n').map_or(t, |nl| t[nl + 1..].trim());
    }
    if let Some(body) = t.strip_suffix("```") {
        t = body.trim();
    }
    t
}
