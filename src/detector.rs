//! One request end to end: parse → validate → vectorize → count check →
//! inference → response.

use crate::config::ServiceConfig;
use crate::error::{DetectError, Stage};
use crate::features::{FeatureExtractor, FeatureVector};
use crate::inference::InferencePipeline;
use crate::schema::{SchemaValidator, TelemetryRecord, TelemetrySchema};
use crate::verdict::{InferenceResult, ResponseAssembler};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Disagreement between the schema, the vectorizer and the loaded artifacts,
/// found at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompatibilityIssue {
    #[error("vectorizer produced {actual} features, schema declares {expected}")]
    VectorizerDrift { expected: usize, actual: usize },

    #[error("{stage} model expects {actual} features, schema declares {expected}")]
    Width { stage: Stage, expected: usize, actual: usize },

    #[error("{stage} model was fit on different feature columns")]
    Columns { stage: Stage },

    #[error("{stage} model trained with {found}, expected {expected}")]
    TrainerVersion { stage: Stage, found: String, expected: String },
}

pub struct BotDetector {
    schema: Arc<TelemetrySchema>,
    extractor: FeatureExtractor,
    pipeline: InferencePipeline,
    assembler: ResponseAssembler,
}

impl BotDetector {
    pub fn new(schema: TelemetrySchema, pipeline: InferencePipeline) -> Self {
        let schema = Arc::new(schema);
        Self {
            extractor: FeatureExtractor::new(schema.clone()),
            schema,
            pipeline,
            assembler: ResponseAssembler::new(),
        }
    }

    /// Build the schema from config and load the model artifacts.
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(
            TelemetrySchema::from_config(&config.schema),
            InferencePipeline::load(&config.models),
        )
    }

    pub fn schema(&self) -> &TelemetrySchema {
        &self.schema
    }

    pub fn pipeline(&self) -> &InferencePipeline {
        &self.pipeline
    }

    /// Expected feature vector length.
    pub fn feature_count(&self) -> usize {
        self.schema.feature_count()
    }

    /// Parse a request body into a JSON object.
    pub fn parse(body: &[u8]) -> Result<Map<String, Value>, DetectError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(DetectError::MalformedRequest("No input data provided".into()));
        }
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| DetectError::MalformedRequest(format!("Request body is not valid JSON: {}", e)))?;
        Self::as_object(value)
    }

    fn as_object(value: Value) -> Result<Map<String, Value>, DetectError> {
        match value {
            Value::Null => Err(DetectError::MalformedRequest("No input data provided".into())),
            Value::Object(map) if map.is_empty() => {
                Err(DetectError::MalformedRequest("No input data provided".into()))
            }
            Value::Object(map) => Ok(map),
            _ => Err(DetectError::MalformedRequest("Request body must be a JSON object".into())),
        }
    }

    pub fn validate(&self, payload: &Map<String, Value>) -> Result<TelemetryRecord, DetectError> {
        Ok(SchemaValidator::new(&self.schema).validate(payload)?)
    }

    /// Vectorize and check the length against the feature-count oracle.
    pub fn vectorize(&self, record: &TelemetryRecord) -> Result<FeatureVector, DetectError> {
        let features = self.extractor.extract(record);
        let expected = self.schema.feature_count();
        if features.len() != expected {
            return Err(DetectError::FeatureCountMismatch {
                expected,
                actual: features.len(),
            });
        }
        Ok(features)
    }

    pub fn classify_record(&self, record: &TelemetryRecord) -> Result<InferenceResult, DetectError> {
        let features = self.vectorize(record)?;
        debug!(features = ?features.as_slice(), "extracted features");
        let outputs = self.pipeline.run(&features)?;
        self.assembler.assemble(&outputs)
    }

    pub fn classify(&self, payload: &Value) -> Result<InferenceResult, DetectError> {
        let map = Self::as_object(payload.clone())?;
        self.classify_map(&map)
    }

    pub fn classify_map(&self, payload: &Map<String, Value>) -> Result<InferenceResult, DetectError> {
        let record = self.validate(payload)?;
        debug!(record = ?record, "validated record");
        self.classify_record(&record)
    }

    pub fn classify_bytes(&self, body: &[u8]) -> Result<InferenceResult, DetectError> {
        let map = Self::parse(body)?;
        self.classify_map(&map)
    }

    /// Startup drift check: vectorizer vs schema, and loaded artifacts vs
    /// schema width, columns and trainer version.
    pub fn self_check(&self, expected_trainer_version: Option<&str>) -> Vec<CompatibilityIssue> {
        let mut issues = Vec::new();
        let expected = self.schema.feature_count();

        let probe = self.extractor.extract(&self.schema.zero_record());
        if probe.len() != expected {
            issues.push(CompatibilityIssue::VectorizerDrift {
                expected,
                actual: probe.len(),
            });
        }

        let names = self.extractor.feature_names();
        for (stage, width, meta) in self.pipeline.ready_models() {
            if width != expected {
                issues.push(CompatibilityIssue::Width {
                    stage,
                    expected,
                    actual: width,
                });
            }
            let Some(meta) = meta else { continue };
            if let Some(fit_names) = &meta.feature_names {
                if *fit_names != names {
                    issues.push(CompatibilityIssue::Columns { stage });
                }
            }
            if let (Some(found), Some(want)) = (&meta.trained_with, expected_trainer_version) {
                if found != want {
                    issues.push(CompatibilityIssue::TrainerVersion {
                        stage,
                        found: found.clone(),
                        expected: want.to_string(),
                    });
                }
            }
        }
        issues
    }
}
