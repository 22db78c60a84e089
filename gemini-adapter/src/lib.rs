//! Gemini adapter for the siniestro extraction protocol.
//!
//! Implements [`siniestro_extraction::ModelInvoker`] over the Gemini
//! `generateContent` REST API, mapping role-tagged messages with text and
//! binary media blocks onto the wire format and extracting the first
//! candidate's text payload.

/// HTTP client implementing the model-invoker trait.
pub mod client;
/// Error types for Gemini API calls.
pub mod error;
/// Wire-format request and response structs.
pub mod types;

pub use client::GeminiClient;
pub use error::GeminiError;
