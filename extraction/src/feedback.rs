//! Builders for the JSON-only output rules and the corrective retry message.
//!
//! The retry strategy is deliberately simple: restate the format rules and
//! hand the model its own bad output to correct. In practice that fixes most
//! quoting and fencing mistakes without a different prompt strategy.

use crate::message::{ContentBlock, Message};

/// Fixed instruction block demanding a single valid JSON object.
const JSON_RULES: &str = "You MUST respond with ONE valid JSON object only. \
    Do not include any prose, prefixes, suffixes, markdown, or code fences. \
    The response MUST be strictly parseable by a standard JSON parser. \
    Use double quotes for all keys and string values. No trailing commas.";

/// Builds the output-format rules appended to a system prompt when JSON-only
/// output is forced.
///
/// When a schema description is supplied it is appended verbatim as the
/// required structure.
#[must_use]
pub fn json_output_rules(schema_description: Option<&str>) -> String {
    schema_description.map_or_else(
        || JSON_RULES.to_string(),
        |desc| format!("{JSON_RULES} The JSON MUST conform to this structure: {desc}"),
    )
}

/// Appends the JSON-only rules to a system prompt under a required-format
/// heading.
#[must_use]
pub fn apply_json_rules(system_prompt: &str, schema_description: Option<&str>) -> String {
    format!(
        "{}\n\n# OUTPUT FORMAT (REQUIRED)\n{}",
        system_prompt.trim(),
        json_output_rules(schema_description)
    )
}

/// Builds the corrective user message for a retry.
///
/// States that the previous response was not valid JSON, restates the
/// no-prose/no-markdown requirement, and includes the previous raw text
/// verbatim for the model to correct.
#[must_use]
pub fn build_correction_message(previous_raw: &str) -> Message {
    Message::user(vec![
        ContentBlock::text(
            "The previous response was NOT valid JSON. Fix it and return ONLY a valid \
             JSON object. REMEMBER: no additional text and no markdown formatting; \
             only the JSON object.",
        ),
        ContentBlock::text(format!("Previous response (to correct):\n{previous_raw}")),
    ])
}
