//! Pipeline configuration resolved from CLI arguments and environment.

use std::path::PathBuf;

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

/// Default model when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Resolved configuration for one batch run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root directory holding one subdirectory per case.
    pub input_dir: PathBuf,
    /// Root directory for per-case output artifacts.
    pub output_dir: PathBuf,
    /// Path to the prompt YAML file.
    pub prompts_path: PathBuf,
    /// Path to the circumstance matrix YAML file.
    pub matrix_path: PathBuf,
    /// Gemini API key.
    pub api_key: String,
    /// Gemini model name.
    pub model: String,
    /// Maximum corrective retries per extraction.
    pub max_retries: usize,
}

impl PipelineConfig {
    /// Reads the API key from the environment.
    ///
    /// Returns `None` when the variable is unset or empty.
    #[must_use]
    pub fn api_key_from_env() -> Option<String> {
        std::env::var(API_KEY_ENV_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_is_a_gemini_model() {
        assert!(DEFAULT_MODEL.starts_with("gemini-"));
    }
}
