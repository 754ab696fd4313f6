use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ecom_core::error::CoreError;
use ecom_db::store::StoreError;
use ecom_worker::GenerationError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps the error types of the lower layers and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent `{error, code}` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// A malformed request body or parameter.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

type ErrorParts = (StatusCode, &'static str, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),

            AppError::Store(store) => match store {
                StoreError::UnknownCategory(_) => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    format!("category: {store}"),
                ),
                StoreError::DuplicateUsername(_) => {
                    (StatusCode::CONFLICT, "CONFLICT", store.to_string())
                }
                StoreError::Database(err) => classify_sqlx_error(err),
            },

            AppError::Generation(generation) => match generation {
                GenerationError::Invalid(core) => classify_core_error(core),
                GenerationError::QueueFull { .. } => (
                    StatusCode::TOO_MANY_REQUESTS,
                    "TOO_MANY_REQUESTS",
                    generation.to_string(),
                ),
                GenerationError::NotFound(_) => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", generation.to_string())
                }
                GenerationError::ShuttingDown => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    generation.to_string(),
                ),
            },

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> ErrorParts {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::AuthenticationFailed(msg) => (
            StatusCode::UNAUTHORIZED,
            "AUTHENTICATION_FAILED",
            msg.clone(),
        ),
        CoreError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

fn internal() -> ErrorParts {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
