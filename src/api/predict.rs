//! POST /api/predict

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    routing::post,
    Json, Router,
};
use tracing::{error, info, info_span, warn};
use uuid::Uuid;

use super::{error::ApiResult, ApiError, AppState};
use crate::error::DetectError;
use crate::verdict::InferenceResult;

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

pub async fn predict(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<InferenceResult>> {
    let request_id = Uuid::new_v4();
    let span = info_span!("predict", %request_id);
    span.in_scope(|| {
        let result = if is_json(&headers) {
            state.detector.classify_bytes(&body)
        } else {
            Err(DetectError::MalformedRequest(
                "Content-Type must be 'application/json'".into(),
            ))
        };
        match result {
            Ok(r) => {
                info!(
                    prediction = r.prediction.as_str(),
                    probability = r.probability,
                    cluster_label = r.cluster_label,
                    "prediction result"
                );
                Ok(Json(r))
            }
            Err(e) if e.is_client_error() => {
                warn!(error = %e, "rejected request");
                Err(ApiError(e))
            }
            Err(e) => {
                error!(stage = %e.stage(), error = %e, "prediction failed");
                Err(ApiError(e))
            }
        }
    })
}

pub fn predict_routes() -> Router<AppState> {
    Router::new().route("/api/predict", post(predict))
}
