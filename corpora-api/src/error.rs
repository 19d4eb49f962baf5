//! Translate [`CoreError`] into the wire shape from spec §7: a stable
//! machine-readable `error` tag, a human `message`, and for validation
//! failures an `errors[]` array. This is the only place in the system that
//! turns a `CoreError` into an HTTP status code — background workers never
//! do this (spec §7 "Propagation policy").

use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use corpora_core::CoreError;
use serde_json::json;

pub struct ApiError(pub CoreError);

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let tag = self.0.tag();
        let status = match &self.0 {
            CoreError::Validation { .. } | CoreError::ValidationFields { .. } => {
                StatusCode::BAD_REQUEST
            }
            CoreError::Auth { .. } => StatusCode::UNAUTHORIZED,
            CoreError::Forbidden { .. } => StatusCode::FORBIDDEN,
            CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            CoreError::Conflict { .. } => StatusCode::CONFLICT,
            CoreError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            CoreError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            CoreError::Embedder { .. } => StatusCode::SERVICE_UNAVAILABLE,
            CoreError::Parse { .. } => StatusCode::BAD_REQUEST,
            CoreError::Internal { .. } | CoreError::Crypto { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Crypto failures are treated as corrupted tenant data, not a detail
        // the client should ever see (spec §7).
        let message = match &self.0 {
            CoreError::Crypto { .. } | CoreError::Internal { .. } => {
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    tracing::error!(error = %self.0, "internal error surfaced to client");
                }
                "an internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let mut body = json!({ "error": tag, "message": message });
        if let CoreError::ValidationFields { errors, .. } = &self.0 {
            body["errors"] = json!(errors);
        }

        let mut headers = HeaderMap::new();
        if let CoreError::RateLimited { retry_after_secs } = &self.0 {
            body["retryAfter"] = json!(retry_after_secs);
            if let Ok(v) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                headers.insert("Retry-After", v);
            }
        }

        (status, headers, Json(body)).into_response()
    }
}
