//! Binary logistic-regression classifier.

use super::artifact::{ensure_finite, ensure_width, read_artifact, ArtifactMeta};
use super::{Classifier, ModelError};
use ndarray::{Array1, ArrayView1};
use serde::Deserialize;
use std::path::Path;

fn default_classes() -> [i64; 2] {
    [0, 1]
}

#[derive(Debug, Deserialize)]
struct LogisticParams {
    #[serde(flatten)]
    meta: ArtifactMeta,
    coef: Vec<f64>,
    intercept: f64,
    #[serde(default = "default_classes")]
    classes: [i64; 2],
}

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    meta: ArtifactMeta,
    coef: Array1<f64>,
    intercept: f64,
    /// `classes[1]` is the positive class
    classes: [i64; 2],
}

impl LogisticRegression {
    pub fn new(meta: ArtifactMeta, coef: Vec<f64>, intercept: f64, classes: [i64; 2]) -> Result<Self, ModelError> {
        if coef.is_empty() || coef.len() != meta.n_features_in {
            return Err(ModelError::Parameters(format!(
                "coef width {} does not match n_features_in {}",
                coef.len(),
                meta.n_features_in
            )));
        }
        ensure_finite("coef", &coef)?;
        ensure_finite("intercept", &[intercept])?;
        if classes[0] == classes[1] {
            return Err(ModelError::Parameters("classes must be distinct".into()));
        }
        Ok(Self {
            meta,
            coef: Array1::from(coef),
            intercept,
            classes,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let p: LogisticParams = read_artifact(path)?;
        Self::new(p.meta, p.coef, p.intercept, p.classes)
    }

    fn positive_probability(&self, x: ArrayView1<f64>) -> Result<f64, ModelError> {
        ensure_width(self.coef.len(), x.len())?;
        let z = self.coef.dot(&x) + self.intercept;
        let p = if z >= 0.0 {
            1.0 / (1.0 + (-z).exp())
        } else {
            let e = z.exp();
            e / (1.0 + e)
        };
        if p.is_finite() {
            Ok(p)
        } else {
            Err(ModelError::NonFinite("decision function".into()))
        }
    }
}

impl Classifier for LogisticRegression {
    fn n_features_in(&self) -> usize {
        self.coef.len()
    }

    fn predict(&self, x: ArrayView1<f64>) -> Result<i64, ModelError> {
        let p = self.positive_probability(x)?;
        Ok(if p > 0.5 { self.classes[1] } else { self.classes[0] })
    }

    fn predict_proba(&self, x: ArrayView1<f64>) -> Result<Vec<f64>, ModelError> {
        let p = self.positive_probability(x)?;
        Ok(vec![1.0 - p, p])
    }

    fn meta(&self) -> Option<&ArtifactMeta> {
        Some(&self.meta)
    }
}
