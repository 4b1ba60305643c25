//! Feature extraction pipeline: validated record → scalars → timings → click counts.

use super::{ClickCounts, FeatureVector};
use crate::schema::{TelemetryRecord, TelemetrySchema};
use std::sync::Arc;

pub struct FeatureExtractor {
    schema: Arc<TelemetrySchema>,
}

impl FeatureExtractor {
    pub fn new(schema: Arc<TelemetrySchema>) -> Self {
        Self { schema }
    }

    /// Build the vector by walking the schema declaration. Absent optional
    /// scalars and absent timings encode as 0.
    pub fn extract(&self, record: &TelemetryRecord) -> FeatureVector {
        let mut values = Vec::with_capacity(self.schema.feature_count());

        for field in self.schema.scalars() {
            values.push(record.scalars.get(&field.name).copied().unwrap_or(0.0));
        }
        for field in self.schema.form_fields() {
            values.push(record.time_per_field.get(field).copied().unwrap_or(0.0));
        }
        let clicks = ClickCounts::from_sequence(&record.sequence_of_clicks, self.schema.click_types());
        if clicks.unknown > 0 {
            tracing::debug!(unknown = clicks.unknown, total = clicks.total(), "unknown click labels dropped");
        }
        values.extend(clicks.to_vector());

        FeatureVector::new(values)
    }

    /// Column names in the same order as [`extract`](Self::extract) output.
    pub fn feature_names(&self) -> Vec<String> {
        self.schema.feature_names()
    }
}
