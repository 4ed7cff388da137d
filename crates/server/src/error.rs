use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use verto_core::VertoError;

/// An error answered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into() }
    }

    pub fn no_text() -> Self {
        Self::bad_request("No text provided")
    }

    /// Validation errors are the caller's fault and answer 400 as they are;
    /// everything else answers 500 prefixed with what was being attempted.
    pub fn from_failure(action: &str, error: &VertoError) -> Self {
        if error.is_validation() {
            Self::bad_request(error.to_string())
        } else {
            Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: format!("{action} failed: {error}") }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "Request failed");
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
