//! Fitted-parameter artifacts: JSON files exported from the trained models.

use super::ModelError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Metadata every artifact carries alongside its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMeta {
    /// Input width the model was fit on
    pub n_features_in: usize,
    /// Column names the model was fit on, if exported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    /// Version of the training toolkit that produced the artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trained_with: Option<String>,
}

impl ArtifactMeta {
    pub fn new(n_features_in: usize) -> Self {
        Self {
            n_features_in,
            feature_names: None,
            trained_with: None,
        }
    }
}

/// Read and parse one artifact file.
pub fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    if !path.exists() {
        return Err(ModelError::NotFound(path.to_path_buf()));
    }
    let data = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn ensure_finite(what: &str, values: &[f64]) -> Result<(), ModelError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ModelError::Parameters(format!("{} contains non-finite values", what)))
    }
}

pub(crate) fn ensure_width(expected: usize, actual: usize) -> Result<(), ModelError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ModelError::Shape { expected, actual })
    }
}
