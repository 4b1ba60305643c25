//! Shared fixtures: telemetry payloads, fitted-artifact files, stub models.

#![allow(dead_code)]

use botsense::config::ModelsConfig;
use botsense::model::{ArtifactMeta, Classifier, ClusterModel, ModelError};
use botsense::schema::SCALAR_FIELDS;
use ndarray::ArrayView1;
use serde_json::{json, Map, Value};
use std::path::Path;

/// Valid payload for the default schema. Scalars get distinct values so
/// column order is observable.
pub fn valid_payload() -> Value {
    let mut map = Map::new();
    for (i, (name, _)) in SCALAR_FIELDS.iter().enumerate() {
        map.insert(name.to_string(), json!(i as f64 + 1.0));
    }
    map.insert("Mouse_Speed".into(), json!(1.2));
    map.insert(
        "Time_per_Field".into(),
        json!({"username": 2.5, "password": 1.75, "email": 3.0}),
    );
    map.insert(
        "Sequence_of_Clicks".into(),
        json!(["left_click", "left_click", "right_click"]),
    );
    Value::Object(map)
}

pub fn without(mut payload: Value, key: &str) -> Value {
    if let Value::Object(map) = &mut payload {
        map.remove(key);
    }
    payload
}

pub fn with(mut payload: Value, key: &str, value: Value) -> Value {
    if let Value::Object(map) = &mut payload {
        map.insert(key.to_string(), value);
    }
    payload
}

fn write_json(path: &Path, value: &Value) {
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

/// Writes identity scaler, two-cluster k-means and a logistic model whose
/// decision is `Mouse_Speed` (column 0), all `width` wide.
pub fn write_artifacts(dir: &Path, width: usize) -> ModelsConfig {
    let mut coef = vec![0.0; width];
    coef[0] = 1.0;
    write_json(
        &dir.join("scaler.json"),
        &json!({
            "n_features_in": width,
            "trained_with": "1.5.2",
            "mean": vec![0.0; width],
            "scale": vec![1.0; width],
        }),
    );
    write_json(
        &dir.join("kmeans.json"),
        &json!({
            "n_features_in": width,
            "centroids": [vec![0.0; width], vec![100.0; width]],
        }),
    );
    write_json(
        &dir.join("logreg.json"),
        &json!({
            "n_features_in": width,
            "coef": coef,
            "intercept": 0.0,
            "classes": [0, 1],
        }),
    );
    ModelsConfig {
        scaler_path: dir.join("scaler.json"),
        cluster_path: dir.join("kmeans.json"),
        classifier_path: dir.join("logreg.json"),
        expected_trainer_version: Some("1.5.2".into()),
    }
}

pub struct FixedCluster(pub usize, pub usize);

impl ClusterModel for FixedCluster {
    fn n_features_in(&self) -> usize {
        self.1
    }

    fn predict(&self, _x: ArrayView1<f64>) -> Result<usize, ModelError> {
        Ok(self.0)
    }
}

pub struct FixedClassifier {
    pub width: usize,
    pub label: i64,
    pub p_positive: f64,
}

impl Classifier for FixedClassifier {
    fn n_features_in(&self) -> usize {
        self.width
    }

    fn predict(&self, _x: ArrayView1<f64>) -> Result<i64, ModelError> {
        Ok(self.label)
    }

    fn predict_proba(&self, _x: ArrayView1<f64>) -> Result<Vec<f64>, ModelError> {
        Ok(vec![1.0 - self.p_positive, self.p_positive])
    }

    fn meta(&self) -> Option<&ArtifactMeta> {
        None
    }
}
