use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hardmode_core::{CoreError, ErrorKind};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `hardmode_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Unparsable identifier, query parameter or body.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Failure outside the core, e.g. a panicked blocking task.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core.kind() {
                ErrorKind::BadRequest => (StatusCode::BAD_REQUEST, "BAD_REQUEST", core.to_string()),
                ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", core.to_string()),
                ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT", core.to_string()),
                ErrorKind::StoreFailure => {
                    tracing::error!(error = %core, "store failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "STORE_FAILURE",
                        core.to_string(),
                    )
                }
            },
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    msg.clone(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
