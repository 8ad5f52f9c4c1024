use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cinelog_core::error::CoreError;
use serde_json::json;

/// Message returned for every 500. The real cause is only logged.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Error type returned by every HTTP handler.
///
/// Domain failures arrive as [`CoreError`]; storage errors have already been
/// folded into [`CoreError::Internal`] or [`CoreError::Conflict`] by the
/// store, so nothing driver-specific reaches this layer.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `cinelog_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The request body could not be decoded.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A failure inside the HTTP layer itself (hashing, token signing).
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// HTTP status, machine-readable code and client-facing message.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(CoreError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string())
            }
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Core(CoreError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "CONFLICT", msg.clone())
            }
            AppError::Core(CoreError::Unauthorized(msg)) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Core(CoreError::Internal(detail)) | AppError::InternalError(detail) => {
                tracing::error!(error = %detail, "Request failed with an internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        (status, axum::Json(json!({ "error": message, "code": code }))).into_response()
    }
}
