//! Fitted per-feature standardization: `(x - mean) / scale`.

use super::artifact::{ensure_finite, ensure_width, read_artifact, ArtifactMeta};
use super::{ModelError, Scaler};
use ndarray::{Array1, ArrayView1};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ScalerParams {
    #[serde(flatten)]
    meta: ArtifactMeta,
    mean: Vec<f64>,
    scale: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct StandardScaler {
    meta: ArtifactMeta,
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Zero-variance columns (scale 0) pass through centered but unscaled.
    pub fn new(meta: ArtifactMeta, mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ModelError> {
        if mean.is_empty() {
            return Err(ModelError::Parameters("scaler has no features".into()));
        }
        if mean.len() != scale.len() || mean.len() != meta.n_features_in {
            return Err(ModelError::Parameters(format!(
                "scaler widths disagree: n_features_in={}, mean={}, scale={}",
                meta.n_features_in,
                mean.len(),
                scale.len()
            )));
        }
        ensure_finite("mean", &mean)?;
        ensure_finite("scale", &scale)?;
        let scale = scale.into_iter().map(|s| if s == 0.0 { 1.0 } else { s }).collect::<Vec<_>>();
        Ok(Self {
            meta,
            mean: Array1::from(mean),
            scale: Array1::from(scale),
        })
    }

    /// Pass-through transform of the given width.
    pub fn identity(n_features: usize) -> Self {
        Self {
            meta: ArtifactMeta::new(n_features),
            mean: Array1::zeros(n_features),
            scale: Array1::ones(n_features),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let p: ScalerParams = read_artifact(path)?;
        Self::new(p.meta, p.mean, p.scale)
    }
}

impl Scaler for StandardScaler {
    fn n_features_in(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, x: ArrayView1<f64>) -> Result<Array1<f64>, ModelError> {
        ensure_width(self.mean.len(), x.len())?;
        Ok((&x - &self.mean) / &self.scale)
    }

    fn meta(&self) -> Option<&ArtifactMeta> {
        Some(&self.meta)
    }
}
