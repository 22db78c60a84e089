//! Coherence ("precisión") evaluation stage.
//!
//! Compares the visual analysis against the claim sheet: plate association,
//! cause interpretation, and responsibility attribution.

use serde_json::Value;
use siniestro_extraction::{ContentBlock, ExtractionRequest, StructuredExtractor};

use crate::errors::PipelineError;

/// Prompt name for the coherence evaluation.
pub const PRECISION_PROMPT: &str = "evaluacion_precision";

/// Evaluates the coherence between the visual analysis and the claim sheet.
pub async fn evaluate_coherence(
    extractor: &StructuredExtractor<'_>,
    visual_report: &Value,
    claim_sheet: &Value,
    max_retries: usize,
) -> Result<Value, PipelineError> {
    let request = ExtractionRequest::new(
        PRECISION_PROMPT,
        vec![
            ContentBlock::text(
                "Evalúa la coherencia entre el ANÁLISIS VISUAL del siniestro y la FICHA \
                 DOCUMENTAL, asociando placas, interpretando la causa del siniestro y \
                 comparando la responsabilidad. Devuelve SOLO un JSON válido siguiendo las \
                 instrucciones del sistema.",
            ),
            ContentBlock::text("ANÁLISIS VISUAL (JSON):"),
            ContentBlock::text(visual_report.to_string()),
            ContentBlock::text("FICHA DEL SINIESTRO (JSON):"),
            ContentBlock::text(claim_sheet.to_string()),
        ],
    )
    .with_max_retries(max_retries);

    Ok(extractor.evaluate(&request).await?)
}
