//! Pipeline error types.

use std::path::PathBuf;

use siniestro_extraction::error::ExtractionError;
use siniestro_extraction::prompts::PromptStoreError;
use siniestro_extraction::InvokeError;
use thiserror::Error;

/// Errors raised while running the claim analysis pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A stage's structured extraction failed terminally.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// A raw model invocation (transcription) failed.
    #[error(transparent)]
    Invoke(#[from] InvokeError),

    /// The prompt file could not be loaded.
    #[error(transparent)]
    PromptStore(#[from] PromptStoreError),

    /// A prompt needed by a non-extraction stage was missing.
    #[error("prompt '{name}' not found in prompt store")]
    PromptMissing {
        /// The symbolic prompt name.
        name: String,
    },

    /// A case input file could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    MediaRead {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A required case input file was not found in the case directory.
    #[error("case '{case}' is missing a {kind} file")]
    MissingInput {
        /// Case directory name.
        case: String,
        /// Which input kind is missing (visual PDF, claim-sheet PNG, audio).
        kind: &'static str,
    },

    /// The circumstance matrix file was invalid.
    #[error("invalid circumstance matrix: {0}")]
    Matrix(String),

    /// Writing an output artifact failed.
    #[error("failed to write '{}': {source}", path.display())]
    ArtifactWrite {
        /// Path that failed to write.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// General I/O failure walking input directories.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
