//! Traffic-incident ("siniestro") claim analysis pipeline.
//!
//! Five sequential stages per case, all thin call sites over the extraction
//! protocol in `siniestro-extraction`:
//!
//! 1. Visual analysis of incident photos / PDFs
//! 2. Claim-sheet ("ficha") extraction from a PNG
//! 3. Audio transcription (plain text)
//! 4. Circumstance evaluation against the circumstance matrix
//! 5. Coherence evaluation of visual analysis vs claim sheet

/// Audio transcription stage.
pub mod audio;
/// Per-case discovery, sequential stage runner, and artifact persistence.
pub mod case;
/// Circumstance evaluation stage.
pub mod circumstances;
/// Pipeline configuration resolved from CLI arguments and environment.
pub mod config;
/// Pipeline error types.
pub mod errors;
/// Circumstance matrix loading and context rendering.
pub mod matrix;
/// Media file loading and MIME detection.
pub mod media;
/// Coherence ("precisión") evaluation stage.
pub mod precision;
/// Visual analysis and claim-sheet extraction stages.
pub mod visual;

pub use case::{CaseInputs, CaseReport, CaseRunner};
pub use config::PipelineConfig;
pub use errors::PipelineError;
pub use matrix::CircumstanceMatrix;
