//! Maps pipeline outputs to the caller-facing result using a fixed label mapping.

use crate::error::{DetectError, Stage};
use crate::inference::StageOutputs;
use serde::{Deserialize, Serialize};

/// Classifier label meaning "human".
pub const HUMAN_LABEL: i64 = 0;
/// Classifier label meaning "bot"; its probability is the one reported.
pub const BOT_LABEL: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Human,
    Bot,
}

impl Verdict {
    pub fn from_label(label: i64) -> Option<Self> {
        match label {
            HUMAN_LABEL => Some(Verdict::Human),
            BOT_LABEL => Some(Verdict::Bot),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Human => "human",
            Verdict::Bot => "bot",
        }
    }
}

/// Result for a single telemetry record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    pub prediction: Verdict,
    /// Probability of the bot class
    pub probability: f64,
    pub cluster_label: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseAssembler;

impl ResponseAssembler {
    pub fn new() -> Self {
        Self
    }

    pub fn assemble(&self, outputs: &StageOutputs) -> Result<InferenceResult, DetectError> {
        let c = &outputs.classification;
        let prediction = Verdict::from_label(c.label).ok_or_else(|| {
            DetectError::numeric(Stage::Classify, format!("classifier produced unmapped label {}", c.label))
        })?;
        Ok(InferenceResult {
            prediction,
            probability: c.probabilities[1],
            cluster_label: outputs.cluster,
        })
    }
}
