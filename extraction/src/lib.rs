//! Structured JSON extraction protocol for unreliable LLM output.
//!
//! A language model is a text channel that only *usually* returns the JSON it
//! was asked for. This crate turns that channel into a deterministic,
//! bounded-retry procedure:
//!
//! - [`repair::extract_json`] - Tolerant parser for fenced / prose-wrapped JSON
//! - [`StructuredExtractor`] - Retry loop feeding the bad output back for correction
//! - [`ExtractionError`] - Typed failure taxonomy with the last raw response attached
//! - [`PromptStore`] - Symbolic-name prompt lookup where absence is reportable, not fatal
//! - [`validate`] - Caller-supplied schema validators and key migrations

/// Request builder for one extraction call.
pub mod config;
/// Error taxonomy for the extraction protocol.
pub mod error;
/// JSON-only output rules and corrective retry messages.
pub mod feedback;
/// Model invoker trait and response payload handling.
pub mod invoker;
/// Role-tagged messages with text and binary media blocks.
pub mod message;
/// The bounded retry state machine.
pub mod orchestrator;
/// YAML-backed prompt store.
pub mod prompts;
/// Repair parsing of model-returned text into JSON values.
pub mod repair;
/// Schema validators, required-key checks, and key-name migrations.
pub mod validate;

pub use config::ExtractionRequest;
pub use error::ExtractionError;
pub use invoker::{InvokeError, ModelInvoker, ModelResponse};
pub use message::{ContentBlock, Message, Role};
pub use orchestrator::StructuredExtractor;
pub use prompts::PromptStore;
pub use repair::{extract_json, RepairError};
pub use validate::SchemaValidator;
