//! Request builder for one extraction call.

use crate::message::ContentBlock;
use crate::validate::SchemaValidator;

/// Inputs for one structured-extraction attempt.
///
/// Built fluently per call site: the prompt name and user content are
/// required, everything else has defaults matching the pipeline's usual
/// behavior (JSON-only output forced, one corrective retry).
#[derive(Clone)]
pub struct ExtractionRequest {
    /// Symbolic name of the system prompt in the store.
    pub prompt_name: String,
    /// Content blocks for the user message (text and/or media).
    pub content: Vec<ContentBlock>,
    /// Optional domain schema validator applied after parsing.
    pub schema_validator: Option<SchemaValidator>,
    /// Optional structure description appended verbatim to the output rules.
    pub schema_description: Option<String>,
    /// Whether to append the JSON-only instruction block to the system prompt.
    pub force_json_only: bool,
    /// Maximum corrective retries after the first attempt (may be 0).
    pub max_retries: usize,
}

impl ExtractionRequest {
    /// Creates a request for the given prompt and user content.
    #[must_use]
    pub fn new(prompt_name: impl Into<String>, content: Vec<ContentBlock>) -> Self {
        Self {
            prompt_name: prompt_name.into(),
            content,
            schema_validator: None,
            schema_description: None,
            force_json_only: true,
            max_retries: 1,
        }
    }

    /// Sets the domain schema validator.
    #[must_use]
    pub fn with_validator(mut self, validator: SchemaValidator) -> Self {
        self.schema_validator = Some(validator);
        self
    }

    /// Sets the structure description included in the output rules.
    #[must_use]
    pub fn with_schema_description(mut self, description: impl Into<String>) -> Self {
        self.schema_description = Some(description.into());
        self
    }

    /// Sets whether JSON-only output is forced (default: true).
    #[must_use]
    pub const fn with_force_json_only(mut self, force: bool) -> Self {
        self.force_json_only = force;
        self
    }

    /// Sets the maximum number of corrective retries (default: 1).
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }
}

impl std::fmt::Debug for ExtractionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionRequest")
            .field("prompt_name", &self.prompt_name)
            .field("content_blocks", &self.content.len())
            .field("has_validator", &self.schema_validator.is_some())
            .field("schema_description", &self.schema_description)
            .field("force_json_only", &self.force_json_only)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}
