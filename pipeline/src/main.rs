//! Batch runner: walks per-case input directories and runs the five-stage
//! claim analysis pipeline over each.

use std::path::PathBuf;

use clap::Parser;
use siniestro_extraction::PromptStore;
use siniestro_gemini::GeminiClient;
use siniestro_pipeline::{
    CaseInputs, CaseRunner, CircumstanceMatrix, PipelineConfig, PipelineError,
};

#[derive(Parser)]
#[command(author, version, about = "Traffic-incident claim analysis pipeline", long_about = None)]
struct Cli {
    /// Root directory holding one subdirectory per case
    #[arg(long, default_value = "./inputs")]
    input: PathBuf,

    /// Root directory for per-case output artifacts
    #[arg(long, default_value = "./outputs")]
    output: PathBuf,

    /// Prompt YAML file
    #[arg(long, default_value = "config/prompts.yaml")]
    prompts: PathBuf,

    /// Circumstance matrix YAML file
    #[arg(long, default_value = "config/circunstancias.yaml")]
    matrix: PathBuf,

    /// Gemini model name
    #[arg(long, default_value = siniestro_pipeline::config::DEFAULT_MODEL)]
    model: String,

    /// Maximum corrective retries per extraction
    #[arg(long, default_value_t = 1)]
    max_retries: usize,
}

#[tokio::main]
async fn main() -> Result<(), PipelineError> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let Some(api_key) = PipelineConfig::api_key_from_env() else {
        tracing::error!(
            "missing API key: set {}",
            siniestro_pipeline::config::API_KEY_ENV_VAR
        );
        std::process::exit(1);
    };

    let config = PipelineConfig {
        input_dir: cli.input,
        output_dir: cli.output,
        prompts_path: cli.prompts,
        matrix_path: cli.matrix,
        api_key,
        model: cli.model,
        max_retries: cli.max_retries,
    };

    run_batch(&config).await
}

async fn run_batch(config: &PipelineConfig) -> Result<(), PipelineError> {
    let prompts = PromptStore::from_yaml_file(&config.prompts_path)?;
    let matrix = CircumstanceMatrix::from_yaml_file(&config.matrix_path)?;
    let client = GeminiClient::new(&config.api_key, &config.model);

    tracing::info!(
        model = %config.model,
        circumstances = matrix.len(),
        "pipeline initialized"
    );

    let runner =
        CaseRunner::new(&client, &prompts, &matrix).with_max_retries(config.max_retries);

    let mut case_dirs: Vec<PathBuf> = std::fs::read_dir(&config.input_dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    case_dirs.sort();

    if case_dirs.is_empty() {
        tracing::warn!(input = %config.input_dir.display(), "no case directories found");
        return Ok(());
    }

    for case_dir in case_dirs {
        let inputs = match CaseInputs::discover(&case_dir) {
            Ok(inputs) => inputs,
            Err(err) => {
                tracing::warn!(case = %case_dir.display(), error = %err, "skipping incomplete case");
                continue;
            }
        };

        tracing::info!(case = %inputs.name, "processing case");
        match runner.run(&inputs, &config.output_dir).await {
            Ok(report) => {
                tracing::info!(
                    case = %report.name,
                    outputs = %report.output_dir.display(),
                    "case completed"
                );
            }
            Err(err) => {
                tracing::error!(case = %inputs.name, error = %err, "case failed");
            }
        }
    }

    Ok(())
}
