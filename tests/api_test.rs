//! Router tests for /api/predict and /api/health.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use botsense::{
    api::{build_router, AppState},
    config::ServerConfig,
    detector::BotDetector,
    inference::InferencePipeline,
    schema::TelemetrySchema,
};
use common::{valid_payload, without, write_artifacts};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot` method

fn setup_app(dir: &Path, drop_classifier: bool) -> axum::Router {
    let mut models = write_artifacts(dir, 24);
    if drop_classifier {
        models.classifier_path = dir.join("missing.json");
    }
    let detector = BotDetector::new(TelemetrySchema::default(), InferencePipeline::load(&models));
    build_router(AppState::new(Arc::new(detector)), &ServerConfig::default())
}

fn predict_request(body: String, content_type: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/api/predict");
    if let Some(ct) = content_type {
        builder = builder.header(header::CONTENT_TYPE, ct);
    }
    builder.body(Body::from(body)).unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

#[tokio::test]
async fn health_is_static_and_ignores_models() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(dir.path(), true);
    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "Server is running.");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn predict_returns_verdict() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(dir.path(), false);
    let response = app
        .oneshot(predict_request(valid_payload().to_string(), Some("application/json")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["prediction"], "bot");
    assert_eq!(body["cluster_label"], 0);
    let p = body["probability"].as_f64().unwrap();
    assert!(p > 0.5 && p <= 1.0);
    assert_eq!(body.as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn predict_requires_json_content_type() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(dir.path(), false);
    let response = app
        .oneshot(predict_request(valid_payload().to_string(), Some("text/plain")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body, json!({"error": "Content-Type must be 'application/json'"}));
}

#[tokio::test]
async fn predict_rejects_non_object_body() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(dir.path(), false);
    let response = app
        .oneshot(predict_request("[1, 2, 3]".into(), Some("application/json; charset=utf-8")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn predict_reports_field_errors() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(dir.path(), false);
    let payload = without(without(valid_payload(), "Mouse_Speed"), "Total_Idle_Time");
    let response = app
        .oneshot(predict_request(payload.to_string(), Some("application/json")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(
        body,
        json!({"error": {
            "Mouse_Speed": ["Missing data for required field."],
            "Total_Idle_Time": ["Missing data for required field."],
        }})
    );
}

#[tokio::test]
async fn predict_without_classifier_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(dir.path(), true);
    let response = app
        .oneshot(predict_request(valid_payload().to_string(), Some("application/json")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["stage"], "classify");
    assert_eq!(body["error"], "Classifier not available. Contact the administrator.");
    assert!(body.get("prediction").is_none());
    assert!(body.get("probability").is_none());
}

#[tokio::test]
async fn numeric_failure_body_is_generic() {
    let dir = tempfile::tempdir().unwrap();
    let models = write_artifacts(dir.path(), 21);
    let detector = BotDetector::new(TelemetrySchema::default(), InferencePipeline::load(&models));
    let app = build_router(AppState::new(Arc::new(detector)), &ServerConfig::default());
    let response = app
        .oneshot(predict_request(valid_payload().to_string(), Some("application/json")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(!text.contains("input width"), "{}", text);
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body, json!({"error": "Error during standardize.", "stage": "standardize"}));
}

#[tokio::test]
async fn static_dir_serves_index_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let site = dir.path().join("build");
    std::fs::create_dir_all(&site).unwrap();
    std::fs::write(site.join("index.html"), "<html>app</html>").unwrap();

    let models = write_artifacts(dir.path(), 24);
    let detector = BotDetector::new(TelemetrySchema::default(), InferencePipeline::load(&models));
    let server = ServerConfig {
        static_dir: Some(site),
        ..ServerConfig::default()
    };
    let app = build_router(AppState::new(Arc::new(detector)), &server);

    let request = Request::builder()
        .uri("/login")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<html>app</html>");
}
