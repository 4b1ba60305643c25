//! HTTP mapping of the detection failure taxonomy.

use crate::error::DetectError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// API error type
#[derive(Debug)]
pub struct ApiError(pub DetectError);

impl From<DetectError> for ApiError {
    fn from(e: DetectError) -> Self {
        ApiError(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self.0 {
            DetectError::MalformedRequest(msg) => json!({ "error": msg }),
            DetectError::SchemaViolation(errors) => json!({ "error": errors }),
            DetectError::FeatureCountMismatch { .. } => json!({
                "error": "Feature extraction failed. Contact the administrator.",
                "stage": "vectorization",
            }),
            DetectError::ModelUnavailable { stage, .. } => json!({
                "error": format!("{} not available. Contact the administrator.", stage.model_name()),
                "stage": stage,
            }),
            DetectError::NumericFailure { stage, .. } => json!({
                "error": format!("Error during {}.", stage.as_str().replace('_', " ")),
                "stage": stage,
            }),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Stage;

    async fn body_of(e: DetectError) -> (StatusCode, serde_json::Value) {
        let response = ApiError(e).into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn feature_count_mismatch_hides_counts() {
        let (status, body) = body_of(DetectError::FeatureCountMismatch { expected: 24, actual: 23 }).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"error": "Feature extraction failed. Contact the administrator.", "stage": "vectorization"})
        );
    }

    #[tokio::test]
    async fn numeric_failure_hides_reason() {
        let err = DetectError::numeric(Stage::ClusterAssign, "non-finite distance");
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Error during cluster assign.", "stage": "cluster_assign"}));
    }
}
