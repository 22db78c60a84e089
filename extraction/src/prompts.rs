//! YAML-backed prompt store.
//!
//! Prompts live in a flat `name: template` YAML mapping, loaded once and
//! looked up by symbolic name. A missing or empty entry is a normal,
//! reportable condition - the caller decides whether to fail the operation.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

/// Errors loading a prompt file.
#[derive(Debug, Error)]
pub enum PromptStoreError {
    /// The prompt file could not be read.
    #[error("failed to read prompt file '{path}': {source}")]
    Io {
        /// Path that failed to read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The prompt file was not a valid YAML string mapping.
    #[error("invalid prompt YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Maps symbolic prompt names to template text.
#[derive(Debug, Clone, Default)]
pub struct PromptStore {
    prompts: HashMap<String, String>,
}

impl PromptStore {
    /// Builds a store from an in-memory name → template mapping.
    #[must_use]
    pub const fn new(prompts: HashMap<String, String>) -> Self {
        Self { prompts }
    }

    /// Loads a store from a YAML string mapping.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, PromptStoreError> {
        let prompts: HashMap<String, String> = serde_yaml::from_str(yaml)?;
        Ok(Self { prompts })
    }

    /// Loads a store from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, PromptStoreError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| PromptStoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Looks up a prompt by symbolic name.
    ///
    /// Returns `None` when the name is absent or maps to an empty template;
    /// both mean "this task has no prompt configured".
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.prompts
            .get(name)
            .map(String::as_str)
            .filter(|template| !template.trim().is_empty())
    }
}
