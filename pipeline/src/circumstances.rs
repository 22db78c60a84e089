//! Circumstance evaluation stage.
//!
//! Consolidates the circumstance-matrix context, the visual analysis JSON,
//! and the declaration transcript into one evaluation request.

use serde_json::Value;
use siniestro_extraction::{ContentBlock, ExtractionRequest, StructuredExtractor};

use crate::errors::PipelineError;

/// Prompt name for the circumstance evaluation.
pub const CIRCUMSTANCES_PROMPT: &str = "evaluar_circunstancias";

/// Evaluates which matrix circumstance applies to the case.
pub async fn evaluate_circumstances(
    extractor: &StructuredExtractor<'_>,
    matrix_context: &str,
    visual_report: &Value,
    transcript: &str,
    max_retries: usize,
) -> Result<Value, PipelineError> {
    let visual_json = visual_report.to_string();
    let request = ExtractionRequest::new(
        CIRCUMSTANCES_PROMPT,
        vec![
            ContentBlock::text(
                "Aplica la matriz de circunstancias al caso siguiente y devuelve SOLO JSON válido:",
            ),
            ContentBlock::text(format!("Contexto de circunstancias:\n{matrix_context}")),
            ContentBlock::text(format!("JSON visual:\n{visual_json}")),
            ContentBlock::text(format!("Transcripción:\n{transcript}")),
        ],
    )
    .with_max_retries(max_retries);

    Ok(extractor.evaluate(&request).await?)
}
