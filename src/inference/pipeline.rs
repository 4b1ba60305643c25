//! Stage runner. Every stage checks availability and input width before
//! touching the model; the first failure short-circuits the rest.

use crate::config::ModelsConfig;
use crate::error::{DetectError, Stage};
use crate::features::FeatureVector;
use crate::model::{
    ArtifactMeta, Classifier, ClusterModel, KMeans, LogisticRegression, ModelError, ModelSlot, Scaler,
    StandardScaler,
};
use ndarray::{Array1, ArrayView1};
use std::path::Path;
use tracing::{debug, error, info};

/// Classifier output: label plus `[p(negative), p(positive)]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: i64,
    pub probabilities: [f64; 2],
}

#[derive(Debug, Clone)]
pub struct StageOutputs {
    pub scaled: Array1<f64>,
    pub cluster: usize,
    pub classification: Classification,
}

/// Process-wide, read-only after construction; share behind `Arc`.
pub struct InferencePipeline {
    scaler: ModelSlot<dyn Scaler>,
    cluster: ModelSlot<dyn ClusterModel>,
    classifier: ModelSlot<dyn Classifier>,
}

fn load_slot<M: ?Sized>(
    stage: Stage,
    path: &Path,
    load: impl FnOnce(&Path) -> Result<Box<M>, ModelError>,
) -> ModelSlot<M> {
    let result = load(path);
    match &result {
        Ok(_) => info!(stage = %stage, path = %path.display(), "model loaded"),
        Err(e) => error!(
            stage = %stage,
            path = %path.display(),
            error = %e,
            "model unavailable; inference requests will fail"
        ),
    }
    ModelSlot::from_result(result)
}

fn unavailable(stage: Stage, reason: &str) -> DetectError {
    DetectError::ModelUnavailable {
        stage,
        reason: reason.to_string(),
    }
}

fn check_width(stage: Stage, expected: usize, actual: usize) -> Result<(), DetectError> {
    if expected == actual {
        Ok(())
    } else {
        Err(DetectError::numeric(
            stage,
            ModelError::Shape { expected, actual },
        ))
    }
}

impl InferencePipeline {
    pub fn new(
        scaler: ModelSlot<dyn Scaler>,
        cluster: ModelSlot<dyn ClusterModel>,
        classifier: ModelSlot<dyn Classifier>,
    ) -> Self {
        Self {
            scaler,
            cluster,
            classifier,
        }
    }

    /// Load all three artifacts once. Never fails: a model that cannot be
    /// loaded leaves its slot unavailable.
    pub fn load(config: &ModelsConfig) -> Self {
        let scaler = load_slot(Stage::Standardize, &config.scaler_path, |p| {
            StandardScaler::load(p).map(|m| Box::new(m) as Box<dyn Scaler>)
        });
        let cluster = load_slot(Stage::ClusterAssign, &config.cluster_path, |p| {
            KMeans::load(p).map(|m| Box::new(m) as Box<dyn ClusterModel>)
        });
        let classifier = load_slot(Stage::Classify, &config.classifier_path, |p| {
            LogisticRegression::load(p).map(|m| Box::new(m) as Box<dyn Classifier>)
        });
        Self::new(scaler, cluster, classifier)
    }

    pub fn is_ready(&self) -> bool {
        self.scaler.is_ready() && self.cluster.is_ready() && self.classifier.is_ready()
    }

    /// Loaded models with their input width and artifact metadata.
    pub fn ready_models(&self) -> Vec<(Stage, usize, Option<&ArtifactMeta>)> {
        let mut out = Vec::with_capacity(3);
        if let Ok(m) = self.scaler.get() {
            out.push((Stage::Standardize, m.n_features_in(), m.meta()));
        }
        if let Ok(m) = self.cluster.get() {
            out.push((Stage::ClusterAssign, m.n_features_in(), m.meta()));
        }
        if let Ok(m) = self.classifier.get() {
            out.push((Stage::Classify, m.n_features_in(), m.meta()));
        }
        out
    }

    /// Fails with `ModelUnavailable` for the first missing model, in stage
    /// order, before any stage runs.
    pub fn ensure_loaded(&self) -> Result<(), DetectError> {
        self.scaler.get().map_err(|r| unavailable(Stage::Standardize, r))?;
        self.cluster.get().map_err(|r| unavailable(Stage::ClusterAssign, r))?;
        self.classifier.get().map_err(|r| unavailable(Stage::Classify, r))?;
        Ok(())
    }

    pub fn run(&self, features: &FeatureVector) -> Result<StageOutputs, DetectError> {
        self.ensure_loaded()?;
        let scaled = self.standardize(features.view())?;
        debug!(scaled = ?scaled.as_slice(), "standardized");
        let cluster = self.assign_cluster(scaled.view())?;
        debug!(cluster, "cluster assigned");
        let classification = self.classify(scaled.view())?;
        debug!(
            label = classification.label,
            p_positive = classification.probabilities[1],
            "classified"
        );
        Ok(StageOutputs {
            scaled,
            cluster,
            classification,
        })
    }

    pub fn standardize(&self, x: ArrayView1<f64>) -> Result<Array1<f64>, DetectError> {
        let stage = Stage::Standardize;
        let scaler = self.scaler.get().map_err(|r| unavailable(stage, r))?;
        check_width(stage, scaler.n_features_in(), x.len())?;
        let out = scaler
            .transform(x)
            .map_err(|e| DetectError::numeric(stage, e))?;
        check_width(stage, x.len(), out.len())?;
        if out.iter().any(|v| !v.is_finite()) {
            return Err(DetectError::numeric(stage, ModelError::NonFinite("scaled features".into())));
        }
        Ok(out)
    }

    pub fn assign_cluster(&self, z: ArrayView1<f64>) -> Result<usize, DetectError> {
        let stage = Stage::ClusterAssign;
        let model = self.cluster.get().map_err(|r| unavailable(stage, r))?;
        check_width(stage, model.n_features_in(), z.len())?;
        model.predict(z).map_err(|e| DetectError::numeric(stage, e))
    }

    pub fn classify(&self, z: ArrayView1<f64>) -> Result<Classification, DetectError> {
        let stage = Stage::Classify;
        let model = self.classifier.get().map_err(|r| unavailable(stage, r))?;
        check_width(stage, model.n_features_in(), z.len())?;
        let label = model.predict(z).map_err(|e| DetectError::numeric(stage, e))?;
        let proba = model.predict_proba(z).map_err(|e| DetectError::numeric(stage, e))?;
        let probabilities: [f64; 2] = proba.as_slice().try_into().map_err(|_| {
            DetectError::numeric(stage, format!("expected 2 class probabilities, got {}", proba.len()))
        })?;
        if probabilities.iter().any(|p| !p.is_finite() || !(0.0..=1.0).contains(p)) {
            return Err(DetectError::numeric(
                stage,
                format!("probabilities out of range: {:?}", probabilities),
            ));
        }
        Ok(Classification { label, probabilities })
    }
}
