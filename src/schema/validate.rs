//! Schema validation: raw JSON object → [`TelemetryRecord`], or every
//! field-level failure at once.

use super::{
    NumberKind, TelemetryRecord, TelemetrySchema, SEQUENCE_OF_CLICKS, SEQUENCE_OF_CLICKS_ALIASES,
    TIME_PER_FIELD, TIME_PER_FIELD_ALIASES,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

const MISSING: &str = "Missing data for required field.";
const NULL: &str = "Field may not be null.";
const NOT_NUMBER: &str = "Not a valid number.";
const NOT_INTEGER: &str = "Not a valid integer.";
const NOT_OBJECT: &str = "Not a valid mapping type.";
const NOT_LIST: &str = "Not a valid list.";
const NOT_STRING: &str = "Not a valid string.";
const NEGATIVE: &str = "Must be greater than or equal to 0.";
const UNKNOWN: &str = "Unknown field.";

/// Errors for one top-level key: plain messages, or messages per sub-key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldError {
    Messages(Vec<String>),
    Nested(BTreeMap<String, Vec<String>>),
}

/// Every field-level failure of one payload, keyed by wire name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(BTreeMap<String, FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.0.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn push(&mut self, field: &str, message: &str) {
        match self
            .0
            .entry(field.to_string())
            .or_insert_with(|| FieldError::Messages(Vec::new()))
        {
            FieldError::Messages(m) => m.push(message.to_string()),
            FieldError::Nested(n) => n.entry("_schema".into()).or_default().push(message.to_string()),
        }
    }

    fn push_nested(&mut self, field: &str, sub: &str, message: &str) {
        let entry = self
            .0
            .entry(field.to_string())
            .or_insert_with(|| FieldError::Nested(BTreeMap::new()));
        if let FieldError::Messages(m) = &mut *entry {
            let mut nested = BTreeMap::new();
            nested.insert("_schema".to_string(), std::mem::take(m));
            *entry = FieldError::Nested(nested);
        }
        if let FieldError::Nested(n) = &mut *entry {
            n.entry(sub.to_string()).or_default().push(message.to_string());
        }
    }
}

/// Validates payloads against one [`TelemetrySchema`].
pub struct SchemaValidator<'a> {
    schema: &'a TelemetrySchema,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(schema: &'a TelemetrySchema) -> Self {
        Self { schema }
    }

    /// Validate a JSON object. Accumulates all errors rather than stopping
    /// at the first.
    pub fn validate(&self, payload: &Map<String, Value>) -> Result<TelemetryRecord, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let mut scalars = HashMap::with_capacity(self.schema.scalars().len());
        for field in self.schema.scalars() {
            match payload.get(&field.name) {
                None if field.required => errors.push(&field.name, MISSING),
                None => {}
                Some(v) => match coerce(v, field.kind) {
                    Ok(x) => {
                        scalars.insert(field.name.clone(), x);
                    }
                    Err(msg) => errors.push(&field.name, msg),
                },
            }
        }

        let time_per_field = match lookup(payload, TIME_PER_FIELD, TIME_PER_FIELD_ALIASES) {
            None => {
                errors.push(TIME_PER_FIELD, MISSING);
                HashMap::new()
            }
            Some((key, v)) => self.validate_timings(key, v, &mut errors),
        };

        let sequence_of_clicks = match lookup(payload, SEQUENCE_OF_CLICKS, SEQUENCE_OF_CLICKS_ALIASES) {
            None => {
                errors.push(SEQUENCE_OF_CLICKS, MISSING);
                Vec::new()
            }
            Some((key, v)) => validate_clicks(key, v, &mut errors),
        };

        if !self.schema.allow_unknown_fields() {
            for key in payload.keys() {
                if !self.schema.is_declared_key(key) {
                    errors.push(key, UNKNOWN);
                }
            }
        }

        if errors.is_empty() {
            Ok(TelemetryRecord {
                scalars,
                time_per_field,
                sequence_of_clicks,
            })
        } else {
            Err(errors)
        }
    }

    fn validate_timings(&self, key: &str, value: &Value, errors: &mut ValidationErrors) -> HashMap<String, f64> {
        let mut out = HashMap::new();
        let obj = match value {
            Value::Object(obj) => obj,
            Value::Null => {
                errors.push(key, NULL);
                return out;
            }
            _ => {
                errors.push(key, NOT_OBJECT);
                return out;
            }
        };

        for field in self.schema.form_fields() {
            match obj.get(field) {
                None => errors.push_nested(key, field, MISSING),
                Some(v) => match coerce(v, NumberKind::Float) {
                    Ok(x) if x < 0.0 => errors.push_nested(key, field, NEGATIVE),
                    Ok(x) => {
                        out.insert(field.clone(), x);
                    }
                    Err(msg) => errors.push_nested(key, field, msg),
                },
            }
        }
        for sub in obj.keys() {
            if !self.schema.form_fields().iter().any(|f| f == sub) {
                errors.push_nested(key, sub, UNKNOWN);
            }
        }
        out
    }
}

fn lookup<'v>(
    payload: &'v Map<String, Value>,
    key: &'static str,
    aliases: &[&'static str],
) -> Option<(&'static str, &'v Value)> {
    std::iter::once(&key)
        .chain(aliases)
        .find_map(|k| payload.get(*k).map(|v| (*k, v)))
}

fn validate_clicks(key: &str, value: &Value, errors: &mut ValidationErrors) -> Vec<String> {
    let items = match value {
        Value::Array(items) => items,
        Value::Null => {
            errors.push(key, NULL);
            return Vec::new();
        }
        _ => {
            errors.push(key, NOT_LIST);
            return Vec::new();
        }
    };
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match item.as_str() {
            Some(label) => out.push(label.to_string()),
            None => errors.push_nested(key, &i.to_string(), NOT_STRING),
        }
    }
    out
}

/// Numeric coercion: numbers and numeric strings; booleans, null and
/// non-finite values are rejected. Integer fields reject fractional values.
fn coerce(value: &Value, kind: NumberKind) -> Result<f64, &'static str> {
    let invalid = match kind {
        NumberKind::Float => NOT_NUMBER,
        NumberKind::Integer => NOT_INTEGER,
    };
    let x = match value {
        Value::Null => return Err(NULL),
        Value::Number(n) => n.as_f64().ok_or(invalid)?,
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| invalid)?,
        _ => return Err(invalid),
    };
    if !x.is_finite() {
        return Err(invalid);
    }
    if kind == NumberKind::Integer && x.fract() != 0.0 {
        return Err(NOT_INTEGER);
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerce_accepts_numeric_strings() {
        assert_eq!(coerce(&json!("1.5"), NumberKind::Float), Ok(1.5));
        assert_eq!(coerce(&json!(" 7 "), NumberKind::Integer), Ok(7.0));
        assert_eq!(coerce(&json!(3.0), NumberKind::Integer), Ok(3.0));
    }

    #[test]
    fn coerce_rejects_non_numbers() {
        assert_eq!(coerce(&json!(true), NumberKind::Float), Err(NOT_NUMBER));
        assert_eq!(coerce(&json!("fast"), NumberKind::Float), Err(NOT_NUMBER));
        assert_eq!(coerce(&json!("NaN"), NumberKind::Float), Err(NOT_NUMBER));
        assert_eq!(coerce(&json!(2.5), NumberKind::Integer), Err(NOT_INTEGER));
        assert_eq!(coerce(&Value::Null, NumberKind::Integer), Err(NULL));
    }

    #[test]
    fn nested_error_keeps_earlier_messages() {
        let mut e = ValidationErrors::default();
        e.push("Time_per_Field", MISSING);
        e.push_nested("Time_per_Field", "email", NEGATIVE);
        match e.get("Time_per_Field") {
            Some(FieldError::Nested(n)) => {
                assert_eq!(n["_schema"], vec![MISSING.to_string()]);
                assert_eq!(n["email"], vec![NEGATIVE.to_string()]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
