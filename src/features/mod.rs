//! Telemetry feature vectorization: validated record → ordered numeric vector.

mod pipeline;
mod behavioral;

pub use pipeline::FeatureExtractor;
pub use behavioral::ClickCounts;

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Ordered feature vector for model input. Length must equal the schema's
/// feature count before it reaches the models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub values: Vec<f64>,
}

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Borrowed view for the model stages.
    pub fn view(&self) -> ArrayView1<'_, f64> {
        ArrayView1::from(self.values.as_slice())
    }
}
