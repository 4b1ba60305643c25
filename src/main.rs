//! Botsense server entrypoint: loads the fitted models once, then serves
//! `/api/predict` and `/api/health` until Ctrl+C.

use botsense::{
    api::{build_router, AppState},
    config::ServiceConfig,
    detector::{BotDetector, CompatibilityIssue},
    logging::StructuredLogger,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("BOTSENSE_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.json"));
    let config = ServiceConfig::load(&config_path)?.with_env()?;

    StructuredLogger::init(&config.log)?;

    info!(
        config = %config_path.display(),
        scaler = %config.models.scaler_path.display(),
        cluster = %config.models.cluster_path.display(),
        classifier = %config.models.classifier_path.display(),
        "botsense starting"
    );

    let detector = Arc::new(BotDetector::from_config(&config));
    info!(
        feature_count = detector.feature_count(),
        models_ready = detector.pipeline().is_ready(),
        "detector initialized"
    );
    for issue in detector.self_check(config.models.expected_trainer_version.as_deref()) {
        match issue {
            CompatibilityIssue::TrainerVersion { .. } => warn!(%issue, "model compatibility check"),
            _ => error!(%issue, "model compatibility check"),
        }
    }

    let app = build_router(AppState::new(detector), &config.server);
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("botsense stopping");
    Ok(())
}
