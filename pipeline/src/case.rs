//! Per-case discovery, sequential stage runner, and artifact persistence.
//!
//! A case is a directory holding one incident PDF, one claim-sheet PNG, and
//! one declaration audio. The five stages run strictly in order - later
//! stages consume earlier artifacts - and every stage's outcome is persisted,
//! success or not, so a failed case still leaves an inspectable trail.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use siniestro_extraction::{ModelInvoker, PromptStore, StructuredExtractor};

use crate::audio::transcribe_audio;
use crate::circumstances::evaluate_circumstances;
use crate::errors::PipelineError;
use crate::matrix::CircumstanceMatrix;
use crate::media::{find_by_extension, AUDIO_EXTENSIONS, CLAIM_SHEET_EXTENSIONS, VISUAL_EXTENSIONS};
use crate::precision::evaluate_coherence;
use crate::visual::{analyze_claim_sheet, analyze_visual};

/// Resolved input files for one case.
#[derive(Debug, Clone)]
pub struct CaseInputs {
    /// Case identifier (the directory name).
    pub name: String,
    /// Incident photos / PDF for the visual analysis.
    pub visual: PathBuf,
    /// Claim-sheet PNG.
    pub claim_sheet: PathBuf,
    /// Declaration audio.
    pub audio: PathBuf,
}

impl CaseInputs {
    /// Discovers a case's input files in its directory.
    ///
    /// Takes the first matching file (sorted by name) per input kind, as the
    /// batch convention defines one of each per case.
    pub fn discover(dir: &Path) -> Result<Self, PipelineError> {
        let name = dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("case")
            .to_string();

        let pick = |extensions: &[&str], kind: &'static str| {
            find_by_extension(dir, extensions)
                .into_iter()
                .next()
                .ok_or(PipelineError::MissingInput {
                    case: name.clone(),
                    kind,
                })
        };

        Ok(Self {
            visual: pick(VISUAL_EXTENSIONS, "visual PDF")?,
            claim_sheet: pick(CLAIM_SHEET_EXTENSIONS, "claim-sheet PNG")?,
            audio: pick(AUDIO_EXTENSIONS, "audio")?,
            name,
        })
    }
}

/// Artifacts produced for one case.
#[derive(Debug, Clone)]
pub struct CaseReport {
    /// Case identifier.
    pub name: String,
    /// Visual analysis result (or error artifact).
    pub visual: Value,
    /// Claim-sheet extraction result (or error artifact).
    pub claim_sheet: Value,
    /// Declaration transcript.
    pub transcript: String,
    /// Circumstance evaluation result (or error artifact).
    pub circumstances: Value,
    /// Coherence evaluation result (or error artifact).
    pub precision: Value,
    /// Directory the artifacts were written to.
    pub output_dir: PathBuf,
}

/// Runs the five pipeline stages for one case and persists the artifacts.
pub struct CaseRunner<'a> {
    invoker: &'a dyn ModelInvoker,
    prompts: &'a PromptStore,
    matrix_context: String,
    max_retries: usize,
}

impl<'a> CaseRunner<'a> {
    /// Creates a runner over the given invoker, prompt store, and matrix,
    /// with one corrective retry per extraction.
    #[must_use]
    pub fn new(
        invoker: &'a dyn ModelInvoker,
        prompts: &'a PromptStore,
        matrix: &CircumstanceMatrix,
    ) -> Self {
        Self {
            invoker,
            prompts,
            matrix_context: matrix.context_text(),
            max_retries: 1,
        }
    }

    /// Sets the maximum corrective retries per extraction.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Runs all stages for one case, writing each artifact as it completes.
    ///
    /// Stage failures do not abort the case: the failure is serialized as that
    /// stage's artifact and fed downstream, matching the batch contract that
    /// every case leaves a full set of output files.
    pub async fn run(
        &self,
        inputs: &CaseInputs,
        output_root: &Path,
    ) -> Result<CaseReport, PipelineError> {
        let output_dir = output_root.join(&inputs.name);
        std::fs::create_dir_all(&output_dir)?;

        let extractor = StructuredExtractor::new(self.invoker, self.prompts);

        tracing::info!(case = %inputs.name, "stage 1/5: visual analysis");
        let visual = artifact(analyze_visual(&extractor, &inputs.visual, self.max_retries).await);
        write_json(&output_dir.join("hechos_visual.json"), &visual)?;

        tracing::info!(case = %inputs.name, "stage 2/5: claim-sheet extraction");
        let claim_sheet =
            artifact(analyze_claim_sheet(&extractor, &inputs.claim_sheet, self.max_retries).await);
        write_json(&output_dir.join("ficha_siniestro.json"), &claim_sheet)?;

        tracing::info!(case = %inputs.name, "stage 3/5: audio transcription");
        let transcript = match transcribe_audio(self.invoker, self.prompts, &inputs.audio).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(case = %inputs.name, error = %err, "transcription failed");
                String::new()
            }
        };
        write_text(&output_dir.join("transcripcion.txt"), &transcript)?;

        tracing::info!(case = %inputs.name, "stage 4/5: circumstance evaluation");
        let circumstances = artifact(
            evaluate_circumstances(
                &extractor,
                &self.matrix_context,
                &visual,
                &transcript,
                self.max_retries,
            )
            .await,
        );
        write_json(&output_dir.join("resultado_circunstancias.json"), &circumstances)?;

        tracing::info!(case = %inputs.name, "stage 5/5: coherence evaluation");
        let precision =
            artifact(evaluate_coherence(&extractor, &visual, &claim_sheet, self.max_retries).await);
        write_json(&output_dir.join("precision_visual_vs_ficha.json"), &precision)?;

        Ok(CaseReport {
            name: inputs.name.clone(),
            visual,
            claim_sheet,
            transcript,
            circumstances,
            precision,
            output_dir,
        })
    }
}

/// Converts a stage outcome into its persisted artifact value.
///
/// Failures become an error object carrying the message and, when the
/// protocol captured it, the last raw model text.
fn artifact(outcome: Result<Value, PipelineError>) -> Value {
    match outcome {
        Ok(value) => value,
        Err(err) => {
            let raw = match &err {
                PipelineError::Extraction(extraction) => extraction.raw_text(),
                _ => None,
            };
            match raw {
                Some(raw_text) => json!({"error": err.to_string(), "raw_response": raw_text}),
                None => json!({"error": err.to_string()}),
            }
        }
    }
}

fn write_json(path: &Path, value: &Value) -> Result<(), PipelineError> {
    let pretty =
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    std::fs::write(path, pretty).map_err(|source| PipelineError::ArtifactWrite {
        path: path.to_path_buf(),
        source,
    })
}

fn write_text(path: &Path, text: &str) -> Result<(), PipelineError> {
    std::fs::write(path, text).map_err(|source| PipelineError::ArtifactWrite {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn touch(dir: &Path, name: &str) {
        let mut f = std::fs::File::create(dir.join(name)).unwrap();
        f.write_all(b"x").unwrap();
    }

    #[test]
    fn discovery_picks_one_file_per_kind() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "informe.pdf");
        touch(dir.path(), "ficha.png");
        touch(dir.path(), "declaracion.mp3");
        touch(dir.path(), "notas.txt");

        let inputs = CaseInputs::discover(dir.path()).unwrap();
        assert!(inputs.visual.ends_with("informe.pdf"));
        assert!(inputs.claim_sheet.ends_with("ficha.png"));
        assert!(inputs.audio.ends_with("declaracion.mp3"));
    }

    #[test]
    fn missing_audio_is_reported_by_kind() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "informe.pdf");
        touch(dir.path(), "ficha.png");

        let err = CaseInputs::discover(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MissingInput { kind: "audio", .. }
        ));
    }

    #[test]
    fn failed_stage_artifact_carries_error_and_raw_text() {
        let outcome = Err(PipelineError::Extraction(
            siniestro_extraction::ExtractionError::RetriesExhausted {
                attempts: 2,
                last_error: siniestro_extraction::error::AttemptError::MalformedJson {
                    message: "expected value".to_string(),
                },
                raw_text: "garbage output".to_string(),
            },
        ));

        let value = artifact(outcome);
        assert!(value["error"].as_str().unwrap().contains("2 attempt(s)"));
        assert_eq!(value["raw_response"], "garbage output");
    }

    #[test]
    fn successful_stage_artifact_is_the_value_itself() {
        let value = artifact(Ok(serde_json::json!({"responsable": "vehiculo_1"})));
        assert_eq!(value["responsable"], "vehiculo_1");
        assert!(value.get("error").is_none());
    }
}
