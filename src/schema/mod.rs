//! Telemetry schema declaration: the single list of fields that both the
//! validator and the vectorizer walk, and the feature-count oracle derived
//! from it.

mod validate;

pub use validate::{FieldError, SchemaValidator, ValidationErrors};

use crate::config::SchemaConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Wire key of the nested per-form-field timing map.
pub const TIME_PER_FIELD: &str = "Time_per_Field";
/// Wire key of the click-label sequence.
pub const SEQUENCE_OF_CLICKS: &str = "Sequence_of_Clicks";

/// Alternate spellings accepted for the two nested keys.
pub const TIME_PER_FIELD_ALIASES: &[&str] = &["TimePerField"];
pub const SEQUENCE_OF_CLICKS_ALIASES: &[&str] = &["SequenceOfClicks"];

/// How a scalar field is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberKind {
    Float,
    Integer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarField {
    pub name: String,
    pub kind: NumberKind,
    pub required: bool,
}

/// Scalar columns in the order the models were fit on.
pub const SCALAR_FIELDS: &[(&str, NumberKind)] = &[
    ("Mouse_Speed", NumberKind::Float),
    ("Movement_Smoothness", NumberKind::Float),
    ("Acceleration", NumberKind::Float),
    ("Direction_Changes", NumberKind::Integer),
    ("Session_Duration", NumberKind::Float),
    ("Total_Session_Time", NumberKind::Float),
    ("Time_to_Submit", NumberKind::Float),
    ("Typing_Speed", NumberKind::Float),
    ("Inter_Key_Interval", NumberKind::Float),
    ("Keystroke_Duration", NumberKind::Float),
    ("Typing_Variability", NumberKind::Float),
    ("Click_Interval", NumberKind::Float),
    ("Click_Rate", NumberKind::Float),
    ("Click_Consistency", NumberKind::Float),
    ("Idle_Time_Between_Actions", NumberKind::Float),
    ("Idle_Time_Before_CAPTCHA", NumberKind::Float),
    ("Total_Idle_Time", NumberKind::Float),
];

pub const FORM_FIELDS: &[&str] = &["username", "password", "email"];

pub const KNOWN_CLICK_TYPES: &[&str] = &["left_click", "right_click", "double_click", "middle_click"];

/// Declared telemetry shape. Field order here is column order downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetrySchema {
    scalars: Vec<ScalarField>,
    form_fields: Vec<String>,
    click_types: Vec<String>,
    allow_unknown_fields: bool,
}

impl Default for TelemetrySchema {
    fn default() -> Self {
        Self::new(
            SCALAR_FIELDS
                .iter()
                .map(|(name, kind)| ScalarField {
                    name: name.to_string(),
                    kind: *kind,
                    required: true,
                })
                .collect(),
            FORM_FIELDS.iter().map(|s| s.to_string()).collect(),
            KNOWN_CLICK_TYPES.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl TelemetrySchema {
    pub fn new(scalars: Vec<ScalarField>, form_fields: Vec<String>, click_types: Vec<String>) -> Self {
        Self {
            scalars,
            form_fields,
            click_types,
            allow_unknown_fields: false,
        }
    }

    /// Default scalar columns with form fields and click types from config.
    pub fn from_config(config: &SchemaConfig) -> Self {
        let base = Self::default();
        Self {
            form_fields: config.form_fields.clone(),
            click_types: config.known_click_types.clone(),
            allow_unknown_fields: config.allow_unknown_fields,
            ..base
        }
    }

    pub fn with_unknown_fields_allowed(mut self, allow: bool) -> Self {
        self.allow_unknown_fields = allow;
        self
    }

    pub fn scalars(&self) -> &[ScalarField] {
        &self.scalars
    }

    pub fn form_fields(&self) -> &[String] {
        &self.form_fields
    }

    pub fn click_types(&self) -> &[String] {
        &self.click_types
    }

    pub fn allow_unknown_fields(&self) -> bool {
        self.allow_unknown_fields
    }

    /// Feature-count oracle: expected vector length, computed from the
    /// declaration alone.
    pub fn feature_count(&self) -> usize {
        self.scalars.len() + self.form_fields.len() + self.click_types.len()
    }

    /// Column names in vector order.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.feature_count());
        names.extend(self.scalars.iter().map(|f| f.name.clone()));
        names.extend(self.form_fields.iter().map(|f| format!("{}.{}", TIME_PER_FIELD, f)));
        names.extend(self.click_types.iter().map(|c| format!("clicks.{}", c)));
        names
    }

    /// Whether `key` is a declared top-level key (scalars, nested keys, aliases).
    pub fn is_declared_key(&self, key: &str) -> bool {
        key == TIME_PER_FIELD
            || key == SEQUENCE_OF_CLICKS
            || TIME_PER_FIELD_ALIASES.contains(&key)
            || SEQUENCE_OF_CLICKS_ALIASES.contains(&key)
            || self.scalars.iter().any(|f| f.name == key)
    }

    /// All-zero record with every declared key populated.
    pub fn zero_record(&self) -> TelemetryRecord {
        TelemetryRecord {
            scalars: self.scalars.iter().map(|f| (f.name.clone(), 0.0)).collect(),
            time_per_field: self.form_fields.iter().map(|f| (f.clone(), 0.0)).collect(),
            sequence_of_clicks: Vec::new(),
        }
    }
}

/// Validated telemetry. Maps are keyed by name; ordering comes from the
/// schema, never from these maps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryRecord {
    pub scalars: HashMap<String, f64>,
    pub time_per_field: HashMap<String, f64>,
    pub sequence_of_clicks: Vec<String>,
}
