//! Nearest-centroid cluster assignment.

use super::artifact::{ensure_finite, ensure_width, read_artifact, ArtifactMeta};
use super::{ClusterModel, ModelError};
use ndarray::{Array2, ArrayView1};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct KMeansParams {
    #[serde(flatten)]
    meta: ArtifactMeta,
    centroids: Vec<Vec<f64>>,
}

#[derive(Debug, Clone)]
pub struct KMeans {
    meta: ArtifactMeta,
    /// One row per cluster
    centroids: Array2<f64>,
}

impl KMeans {
    pub fn new(meta: ArtifactMeta, centroids: Vec<Vec<f64>>) -> Result<Self, ModelError> {
        let k = centroids.len();
        if k == 0 {
            return Err(ModelError::Parameters("no centroids".into()));
        }
        let dim = meta.n_features_in;
        let mut flat = Vec::with_capacity(k * dim);
        for (i, row) in centroids.iter().enumerate() {
            if row.len() != dim {
                return Err(ModelError::Parameters(format!(
                    "centroid {} has width {}, expected {}",
                    i,
                    row.len(),
                    dim
                )));
            }
            flat.extend_from_slice(row);
        }
        ensure_finite("centroids", &flat)?;
        let centroids = Array2::from_shape_vec((k, dim), flat)
            .map_err(|e| ModelError::Parameters(e.to_string()))?;
        Ok(Self { meta, centroids })
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let p: KMeansParams = read_artifact(path)?;
        Self::new(p.meta, p.centroids)
    }
}

impl ClusterModel for KMeans {
    fn n_features_in(&self) -> usize {
        self.centroids.ncols()
    }

    /// Index of the closest centroid by squared Euclidean distance; ties go
    /// to the lower index.
    fn predict(&self, x: ArrayView1<f64>) -> Result<usize, ModelError> {
        ensure_width(self.centroids.ncols(), x.len())?;
        let mut best: Option<(usize, f64)> = None;
        for (i, c) in self.centroids.outer_iter().enumerate() {
            let d = (&c - &x).mapv(|v| v * v).sum();
            if !d.is_finite() {
                return Err(ModelError::NonFinite(format!("distance to centroid {}", i)));
            }
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
            .ok_or_else(|| ModelError::Parameters("no centroids".into()))
    }

    fn meta(&self) -> Option<&ArtifactMeta> {
        Some(&self.meta)
    }
}
