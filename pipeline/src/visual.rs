//! Visual analysis and claim-sheet extraction stages.
//!
//! Both send image/PDF media to the model through the shared extraction
//! protocol. The visual analysis enforces the structured-report contract
//! (fixed top-level keys, with migrations for key names produced by earlier
//! prompt revisions); the claim-sheet extraction takes whatever JSON the
//! model returns for the sheet.

use std::path::Path;

use serde_json::Value;
use siniestro_extraction::validate::{migrating_validator, required_keys_validator};
use siniestro_extraction::{ContentBlock, ExtractionRequest, StructuredExtractor};

use crate::errors::PipelineError;
use crate::media::media_block_from_file;

/// Prompt name for the visual analysis.
pub const VISUAL_PROMPT: &str = "extraction_visual";
/// Prompt name for the claim-sheet extraction.
pub const CLAIM_SHEET_PROMPT: &str = "extraction_visual_ficha";

/// Top-level keys the visual analysis report must carry.
pub const VISUAL_REQUIRED_KEYS: &[&str] = &[
    "metadata_analisis",
    "observaciones_objetivas",
    "inferencias_tecnicas",
    "limitaciones_y_incertidumbres",
];

/// Key-name variants from earlier prompt revisions, renamed to the current
/// contract before validation.
pub const VISUAL_KEY_MIGRATIONS: &[(&str, &str)] = &[
    ("inferencias_preliminares", "inferencias_tecnicas"),
    ("observaciones", "observaciones_objetivas"),
];

/// Runs the visual analysis over an incident photo or PDF.
///
/// The report contract distinguishes "JSON but wrong shape" from "not JSON":
/// a parse failure and a missing required key surface as different error
/// kinds from the protocol.
pub async fn analyze_visual(
    extractor: &StructuredExtractor<'_>,
    file: &Path,
    max_retries: usize,
) -> Result<Value, PipelineError> {
    let media = media_block_from_file(file)?;
    let request = ExtractionRequest::new(
        VISUAL_PROMPT,
        vec![
            ContentBlock::text(
                "Analiza todas las imágenes siguientes según el formato establecido:",
            ),
            media,
        ],
    )
    .with_validator(migrating_validator(
        VISUAL_KEY_MIGRATIONS,
        required_keys_validator(VISUAL_REQUIRED_KEYS),
    ))
    .with_max_retries(max_retries);

    Ok(extractor.evaluate(&request).await?)
}

/// Extracts the claim-sheet ("ficha del siniestro") JSON from a sheet image.
pub async fn analyze_claim_sheet(
    extractor: &StructuredExtractor<'_>,
    file: &Path,
    max_retries: usize,
) -> Result<Value, PipelineError> {
    let media = media_block_from_file(file)?;
    let request = ExtractionRequest::new(
        CLAIM_SHEET_PROMPT,
        vec![
            ContentBlock::text("Extrae exactamente el JSON solicitado:"),
            media,
        ],
    )
    .with_max_retries(max_retries);

    Ok(extractor.evaluate(&request).await?)
}
