//! HTTP surface: prediction, health, optional static frontend.

mod error;
mod health;
mod predict;

pub use error::{ApiError, ApiResult};
pub use health::{health_check, HealthResponse};
pub use predict::predict;

use crate::config::ServerConfig;
use crate::detector::BotDetector;
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub detector: Arc<BotDetector>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(detector: Arc<BotDetector>) -> Self {
        Self {
            detector,
            started_at: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    let mut router = Router::new()
        .merge(predict::predict_routes())
        .merge(health::health_routes())
        .with_state(state);

    if let Some(dir) = &server.static_dir {
        let index = ServeFile::new(dir.join("index.html"));
        router = router.fallback_service(ServeDir::new(dir).fallback(index));
    }
    if server.cors_permissive {
        router = router.layer(CorsLayer::permissive());
    }
    router.layer(TraceLayer::new_for_http())
}
