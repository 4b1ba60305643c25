//! Failure taxonomy for one classification request.

use crate::schema::ValidationErrors;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Where in the request lifecycle a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validation,
    Vectorization,
    Standardize,
    ClusterAssign,
    Classify,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validation => "validation",
            Stage::Vectorization => "vectorization",
            Stage::Standardize => "standardize",
            Stage::ClusterAssign => "cluster_assign",
            Stage::Classify => "classify",
        }
    }

    /// Artifact backing this stage, for caller-facing messages.
    pub fn model_name(&self) -> &'static str {
        match self {
            Stage::Standardize => "Scaler",
            Stage::ClusterAssign => "Cluster model",
            Stage::Classify => "Classifier",
            Stage::Validation | Stage::Vectorization => "Feature schema",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum DetectError {
    /// Body is not JSON, not an object, or empty.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("schema violation: {0}")]
    SchemaViolation(#[from] ValidationErrors),

    /// Vectorizer output disagrees with the schema's feature count.
    #[error("feature count mismatch: expected {expected}, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    #[error("{stage} model unavailable: {reason}")]
    ModelUnavailable { stage: Stage, reason: String },

    #[error("numeric failure in {stage}: {reason}")]
    NumericFailure { stage: Stage, reason: String },
}

impl DetectError {
    pub fn stage(&self) -> Stage {
        match self {
            DetectError::MalformedRequest(_) | DetectError::SchemaViolation(_) => Stage::Validation,
            DetectError::FeatureCountMismatch { .. } => Stage::Vectorization,
            DetectError::ModelUnavailable { stage, .. } | DetectError::NumericFailure { stage, .. } => *stage,
        }
    }

    /// Caller can fix the request; everything else is a server-side fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DetectError::MalformedRequest(_) | DetectError::SchemaViolation(_)
        )
    }

    pub fn numeric(stage: Stage, reason: impl fmt::Display) -> Self {
        DetectError::NumericFailure {
            stage,
            reason: reason.to_string(),
        }
    }
}
