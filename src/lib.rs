//! Botsense — behavioral-biometrics bot/human classifier for web form telemetry.
//!
//! Modular structure:
//! - [`schema`] — Telemetry shape declaration, validation, feature-count oracle
//! - [`features`] — Ordered feature vectorization
//! - [`model`] — Fitted scaler, cluster and classifier artifacts
//! - [`inference`] — Standardize → cluster-assign → classify
//! - [`verdict`] — Label mapping and response assembly
//! - [`detector`] — One request end to end
//! - [`api`] — HTTP routes
//! - [`logging`] — Structured JSON logging

pub mod api;
pub mod config;
pub mod detector;
pub mod error;
pub mod features;
pub mod inference;
pub mod logging;
pub mod model;
pub mod schema;
pub mod verdict;

pub use api::{build_router, AppState};
pub use config::ServiceConfig;
pub use detector::BotDetector;
pub use error::{DetectError, Stage};
pub use features::{FeatureExtractor, FeatureVector};
pub use inference::InferencePipeline;
pub use logging::StructuredLogger;
pub use schema::{TelemetryRecord, TelemetrySchema};
pub use verdict::{InferenceResult, Verdict};
