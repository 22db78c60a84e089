//! Circumstance matrix loading and context rendering.
//!
//! The matrix lists the defined incident circumstances with their CESVI
//! description and the National Transit Code article backing them. It is
//! rendered once into a readable context block and fed verbatim to the
//! circumstance-evaluation prompt.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::PipelineError;

/// One circumstance entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circumstance {
    /// Circumstance identifier (e.g. `"C1"`).
    pub id: String,
    /// National Transit Code article grounding the circumstance.
    pub transit_code: String,
    /// CESVI technical description.
    pub description: String,
}

/// The loaded circumstance matrix.
#[derive(Debug, Clone)]
pub struct CircumstanceMatrix {
    entries: Vec<Circumstance>,
}

impl CircumstanceMatrix {
    /// Loads the matrix from a YAML list of circumstance entries.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, PipelineError> {
        let entries: Vec<Circumstance> =
            serde_yaml::from_str(yaml).map_err(|e| PipelineError::Matrix(e.to_string()))?;
        if entries.is_empty() {
            return Err(PipelineError::Matrix(
                "matrix file contains no circumstances".to_string(),
            ));
        }
        Ok(Self { entries })
    }

    /// Loads the matrix from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let yaml = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&yaml)
    }

    /// Number of circumstances in the matrix.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the matrix is empty (never true for a loaded matrix).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the matrix as the readable context block for the LLM.
    #[must_use]
    pub fn context_text(&self) -> String {
        let mut text = format!(
            "Estas son las {} circunstancias definidas, con su justificación legal y técnica:\n\n",
            self.entries.len()
        );
        for entry in &self.entries {
            text.push_str(&format!(
                "{}:\n- Descripción CESVI: {}\n- Fundamento legal (Código Nacional de Tránsito): {}\n\n",
                entry.id, entry.description, entry.transit_code
            ));
        }
        text.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
- id: C1
  transit_code: \"Art. 60\"
  description: \"Vehículo que colisiona por alcance\"
- id: C2
  transit_code: \"Art. 66\"
  description: \"Vehículo que gira sin ceder el paso\"
";

    #[test]
    fn context_renders_every_entry() {
        let matrix = CircumstanceMatrix::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(matrix.len(), 2);

        let context = matrix.context_text();
        assert!(context.starts_with("Estas son las 2 circunstancias"));
        assert!(context.contains("C1:"));
        assert!(context.contains("Descripción CESVI: Vehículo que gira sin ceder el paso"));
        assert!(context.contains("Fundamento legal (Código Nacional de Tránsito): Art. 60"));
        assert!(!context.ends_with('\n'));
    }

    #[test]
    fn empty_matrix_is_rejected() {
        assert!(CircumstanceMatrix::from_yaml_str("[]").is_err());
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        let err = CircumstanceMatrix::from_yaml_str("- id: only\n").unwrap_err();
        assert!(matches!(err, PipelineError::Matrix(_)));
    }
}
