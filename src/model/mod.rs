//! Fitted numeric models consumed by the inference pipeline, behind narrow
//! traits so the pipeline never depends on how they were trained.

mod artifact;
mod kmeans;
mod logistic;
mod scaler;

pub use artifact::{read_artifact, ArtifactMeta};
pub use kmeans::KMeans;
pub use logistic::LogisticRegression;
pub use scaler::StandardScaler;

use ndarray::{Array1, ArrayView1};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("artifact not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid artifact {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("inconsistent parameters: {0}")]
    Parameters(String),

    #[error("input width {actual} does not match expected {expected}")]
    Shape { expected: usize, actual: usize },

    #[error("non-finite value in {0}")]
    NonFinite(String),
}

/// Fitted affine transform.
pub trait Scaler: Send + Sync {
    fn n_features_in(&self) -> usize;
    fn transform(&self, x: ArrayView1<f64>) -> Result<Array1<f64>, ModelError>;
    fn meta(&self) -> Option<&ArtifactMeta> {
        None
    }
}

/// Fitted partition model.
pub trait ClusterModel: Send + Sync {
    fn n_features_in(&self) -> usize;
    fn predict(&self, x: ArrayView1<f64>) -> Result<usize, ModelError>;
    fn meta(&self) -> Option<&ArtifactMeta> {
        None
    }
}

/// Fitted probabilistic binary classifier. `predict_proba` returns
/// `[p(classes[0]), p(classes[1])]`.
pub trait Classifier: Send + Sync {
    fn n_features_in(&self) -> usize;
    fn predict(&self, x: ArrayView1<f64>) -> Result<i64, ModelError>;
    fn predict_proba(&self, x: ArrayView1<f64>) -> Result<Vec<f64>, ModelError>;
    fn meta(&self) -> Option<&ArtifactMeta> {
        None
    }
}

/// A model handle fixed at startup: loaded, or unavailable with the reason.
pub enum ModelSlot<M: ?Sized> {
    Ready(Box<M>),
    Unavailable(String),
}

impl<M: ?Sized> ModelSlot<M> {
    pub fn from_result(result: Result<Box<M>, ModelError>) -> Self {
        match result {
            Ok(m) => ModelSlot::Ready(m),
            Err(e) => ModelSlot::Unavailable(e.to_string()),
        }
    }

    pub fn get(&self) -> Result<&M, &str> {
        match self {
            ModelSlot::Ready(m) => Ok(&**m),
            ModelSlot::Unavailable(reason) => Err(reason.as_str()),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ModelSlot::Ready(_))
    }
}
