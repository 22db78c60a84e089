//! The bounded retry state machine for structured extraction.
//!
//! One `evaluate` call walks Drafting → Invoking → Parsing → Validating and
//! either succeeds or loops through Retrying with a corrective message
//! carrying the previous raw output. The loop is strictly sequential - each
//! retry depends on the previous attempt's text - and all state is local to
//! the call, so independent calls may run concurrently.

use serde_json::Value;

use crate::config::ExtractionRequest;
use crate::error::{AttemptError, ExtractionError};
use crate::feedback::{apply_json_rules, build_correction_message};
use crate::invoker::ModelInvoker;
use crate::message::Message;
use crate::prompts::PromptStore;
use crate::repair::{extract_json, RepairError};
use crate::validate::SchemaValidator;

/// Orchestrates model invocation, repair parsing, and schema validation into
/// one deterministic bounded-retry procedure.
///
/// Holds no mutable state; the invoker and prompt store are injected at
/// construction so tests can run against a canned fake.
pub struct StructuredExtractor<'a> {
    invoker: &'a dyn ModelInvoker,
    prompts: &'a PromptStore,
}

impl<'a> StructuredExtractor<'a> {
    /// Creates an extractor over the given invoker and prompt store.
    #[must_use]
    pub const fn new(invoker: &'a dyn ModelInvoker, prompts: &'a PromptStore) -> Self {
        Self { invoker, prompts }
    }

    /// Runs one extraction: first attempt plus up to `max_retries` corrective
    /// round-trips.
    ///
    /// On success the validated (possibly validator-transformed) JSON value is
    /// returned directly. The first attempt is never counted as a retry, so at
    /// most `max_retries + 1` invocations are made.
    ///
    /// # Errors
    ///
    /// - [`ExtractionError::PromptMissing`] when the prompt name is not in the
    ///   store; the invoker is never called.
    /// - [`ExtractionError::RetriesExhausted`] when no attempt produced
    ///   conformant JSON; carries the last attempt's raw text.
    /// - [`ExtractionError::Transport`] when the invoker itself fails.
    pub async fn evaluate(&self, request: &ExtractionRequest) -> Result<Value, ExtractionError> {
        let Some(base_prompt) = self.prompts.get(&request.prompt_name) else {
            return Err(ExtractionError::PromptMissing {
                name: request.prompt_name.clone(),
            });
        };

        let system_text = if request.force_json_only {
            apply_json_rules(base_prompt, request.schema_description.as_deref())
        } else {
            base_prompt.trim().to_string()
        };

        let system = Message::system(system_text);
        let first_messages = vec![system.clone(), Message::user(request.content.clone())];

        tracing::info!(prompt = %request.prompt_name, "sending extraction request (attempt 1)");
        let mut raw = self.invoker.invoke(&first_messages).await?.into_text();
        let mut outcome = parse_and_validate(&raw, request.schema_validator.as_ref());

        let mut retries_used = 0;
        while retries_used < request.max_retries {
            let err = match outcome {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            retries_used += 1;
            tracing::warn!(
                prompt = %request.prompt_name,
                retry = retries_used,
                error = %err,
                "response was not conformant JSON, retrying with correction"
            );

            let retry_messages = vec![system.clone(), build_correction_message(&raw)];
            raw = self.invoker.invoke(&retry_messages).await?.into_text();
            outcome = parse_and_validate(&raw, request.schema_validator.as_ref());
        }

        outcome.map_err(|last_error| {
            tracing::error!(
                prompt = %request.prompt_name,
                attempts = retries_used + 1,
                error = %last_error,
                "extraction failed after exhausting retries"
            );
            ExtractionError::RetriesExhausted {
                attempts: retries_used + 1,
                last_error,
                raw_text: raw,
            }
        })
    }
}

/// One parse-and-validate pass over raw model text.
///
/// Validator rejection is treated identically to a parse failure: the parsed
/// value is discarded and the rejection reason becomes the current error.
fn parse_and_validate(
    raw: &str,
    validator: Option<&SchemaValidator>,
) -> Result<Value, AttemptError> {
    let parsed = extract_json(raw).map_err(|err| match err {
        RepairError::EmptyResponse => AttemptError::EmptyResponse,
        RepairError::Unparseable { message } => AttemptError::MalformedJson { message },
    })?;

    match validator {
        Some(validate) => {
            validate(parsed).map_err(|reason| AttemptError::SchemaViolation { reason })
        }
        None => Ok(parsed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validator_rejection_is_schema_violation() {
        let validator: SchemaValidator =
            std::sync::Arc::new(|_| Err("wrong shape".to_string()));
        let err = parse_and_validate("{\"a\": 1}", Some(&validator)).unwrap_err();
        assert!(matches!(err, AttemptError::SchemaViolation { .. }));
    }

    #[test]
    fn validator_may_transform_the_value() {
        let validator: SchemaValidator = std::sync::Arc::new(|mut value| {
            value["checked"] = json!(true);
            Ok(value)
        });
        let value = parse_and_validate("{\"a\": 1}", Some(&validator)).unwrap();
        assert_eq!(value, json!({"a": 1, "checked": true}));
    }

    #[test]
    fn empty_text_maps_to_empty_response() {
        let err = parse_and_validate("", None).unwrap_err();
        assert!(matches!(err, AttemptError::EmptyResponse));
    }
}
