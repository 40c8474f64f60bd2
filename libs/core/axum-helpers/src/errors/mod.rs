pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Error as UuidError;
use validator::ValidationErrors;

static EXPOSE_TRACES: AtomicBool = AtomicBool::new(false);

/// Include `details.trace` on 5xx responses. Call once at startup; off by default.
pub fn set_expose_error_traces(enabled: bool) {
    EXPOSE_TRACES.store(enabled, Ordering::Relaxed);
}

pub fn expose_error_traces() -> bool {
    EXPOSE_TRACES.load(Ordering::Relaxed)
}

/// Body of every error response.
///
/// ```json
/// {
///   "code": 1007,
///   "error": "FORBIDDEN",
///   "message": "Not authorized to modify this seed product",
///   "details": null
/// }
/// ```
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable identifier
    pub error: String,
    pub message: String,
    /// Validation field errors, or the error chain on 5xx outside production
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON parsing error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("UUID error: {0}")]
    UuidError(#[from] UuidError),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Storage failure. `trace` is the debug rendering of the source chain.
    #[error("Database error: {message}")]
    Database { message: String, trace: String },

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    /// Wraps any error as [`AppError::Database`], keeping its debug chain as the trace.
    pub fn database<E: std::fmt::Debug + std::fmt::Display>(err: E) -> Self {
        Self::Database {
            message: err.to_string(),
            trace: format!("{err:?}"),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::JsonExtractorRejection(e) => e.status(),
            AppError::ValidationError(_) | AppError::UuidError(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::SerdeJson(_)
            | AppError::Database { .. }
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            AppError::SerdeJson(_) => ErrorCode::SerdeJsonError,
            AppError::JsonExtractorRejection(_) => ErrorCode::JsonExtraction,
            AppError::ValidationError(_) | AppError::BadRequest(_) => ErrorCode::ValidationError,
            AppError::UuidError(_) => ErrorCode::InvalidUuid,
            AppError::Unauthorized(_) => ErrorCode::Unauthorized,
            AppError::Forbidden(_) => ErrorCode::Forbidden,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::Conflict(_) => ErrorCode::Conflict,
            AppError::Database { .. } => ErrorCode::DatabaseError,
            AppError::InternalServerError(_) => ErrorCode::InternalError,
            AppError::ServiceUnavailable(_) => ErrorCode::ServiceUnavailable,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.error_code();
        let error_code = code.code();

        let (message, details) = match self {
            AppError::SerdeJson(e) => {
                tracing::error!(error_code, error = ?e, "JSON serialization failed");
                (code.default_message().to_string(), trace_details(None, format!("{e:?}")))
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error_code, error = %e, "Rejected request body");
                (e.body_text(), None)
            }
            AppError::ValidationError(e) => {
                tracing::info!(error_code, error = %e, "Validation failed");
                let details = serde_json::to_value(&e).unwrap_or(Value::Null);
                (code.default_message().to_string(), Some(details))
            }
            AppError::UuidError(e) => {
                tracing::warn!(error_code, error = %e, "Invalid UUID");
                (code.default_message().to_string(), None)
            }
            AppError::BadRequest(msg) => {
                tracing::info!(error_code, "Bad request: {}", msg);
                (msg, None)
            }
            AppError::Unauthorized(msg) => {
                tracing::info!(error_code, "Unauthorized: {}", msg);
                (msg, None)
            }
            AppError::Forbidden(msg) => {
                tracing::info!(error_code, "Forbidden: {}", msg);
                (msg, None)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code, "Not found: {}", msg);
                (msg, None)
            }
            AppError::Conflict(msg) => {
                tracing::info!(error_code, "Conflict: {}", msg);
                (msg, None)
            }
            AppError::Database { message, trace } => {
                tracing::error!(error_code, %trace, "Database error: {}", message);
                let details = trace_details(Some(&message), trace);
                (message, details)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(error_code, "Internal server error: {}", msg);
                (msg, None)
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!(error_code, "Service unavailable: {}", msg);
                (msg, None)
            }
        };

        let body = Json(ErrorResponse {
            code: error_code,
            error: code.as_str().to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

fn trace_details(message: Option<&str>, trace: String) -> Option<Value> {
    if !expose_error_traces() {
        return None;
    }
    Some(match message {
        Some(message) => json!({ "error": message, "trace": trace }),
        None => json!({ "trace": trace }),
    })
}

/// Build an error response without going through [`AppError`].
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    let body = Json(ErrorResponse {
        code: error_code.code(),
        error: error_code.as_str().to_string(),
        message,
        details: None,
    });

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_client_errors_map_to_status_and_code() {
        let cases = [
            (AppError::Forbidden("nope".into()), StatusCode::FORBIDDEN, "FORBIDDEN"),
            (AppError::NotFound("gone".into()), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (AppError::Conflict("twice".into()), StatusCode::CONFLICT, "CONFLICT"),
            (
                AppError::BadRequest("Missing required field: name".into()),
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                AppError::Unauthorized("Authentication required".into()),
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
            ),
        ];

        for (err, status, error) in cases {
            let message = match &err {
                AppError::Forbidden(m)
                | AppError::NotFound(m)
                | AppError::Conflict(m)
                | AppError::BadRequest(m)
                | AppError::Unauthorized(m) => m.clone(),
                _ => unreachable!(),
            };
            let (actual_status, body) = render(err).await;
            assert_eq!(actual_status, status);
            assert_eq!(body["error"], error);
            assert_eq!(body["message"], message);
            assert!(body.get("details").is_none());
        }
    }

    // Single test owns the global toggle so parallel tests never observe a flip.
    #[tokio::test]
    async fn test_database_trace_follows_toggle() {
        set_expose_error_traces(true);
        let (status, body) = render(AppError::database("connection reset")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], 2003);
        assert_eq!(body["message"], "connection reset");
        assert_eq!(body["details"]["trace"], "\"connection reset\"");

        set_expose_error_traces(false);
        let (_, body) = render(AppError::database("connection reset")).await;
        assert!(body.get("details").is_none());
    }

    #[test]
    fn test_error_response_helper() {
        let response = error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "draining".to_string(),
            ErrorCode::ServiceUnavailable,
        );
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
