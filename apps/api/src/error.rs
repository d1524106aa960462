// =============================================================================
// API Error Envelope
// =============================================================================
//
// Every failed request returns the same JSON shape:
//
//   { "code": "CONFLICT", "message": "slot a1b2... has no remaining capacity" }
//
// The code is the machine-readable class, the message is for humans. Engine
// errors carry their class with them, so the translation here is a straight
// table:
//
//   VALIDATION  -> 400    CONFLICT   -> 409    INTEGRITY -> 400 (+ warn log)
//   DEPENDENCY  -> 503    NOT_FOUND  -> 404    FORBIDDEN -> 403
//   INTERNAL    -> 500
//
// Internal errors are logged with full detail and returned with a generic
// message; database text never reaches a client.
//
// =============================================================================

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use parlor_core::ErrorClass;
use parlor_engine::EngineError;

/// Machine-readable error class, serialized as SCREAMING_SNAKE_CASE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Validation,
    Conflict,
    Integrity,
    Dependency,
    NotFound,
    Forbidden,
    Internal,
}

/// The error body returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Validation, message)
    }

    /// HTTP status implied by the error code.
    pub fn status(&self) -> StatusCode {
        match self.code {
            ErrorCode::Validation | ErrorCode::Integrity => StatusCode::BAD_REQUEST,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::Dependency => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err.class() {
            ErrorClass::Validation => ApiError::new(ErrorCode::Validation, err.to_string()),
            ErrorClass::Conflict => ApiError::new(ErrorCode::Conflict, err.to_string()),
            ErrorClass::Integrity => {
                tracing::warn!(error = %err, "integrity check failed");
                ApiError::new(ErrorCode::Integrity, err.to_string())
            }
            ErrorClass::Dependency => ApiError::new(ErrorCode::Dependency, err.to_string()),
            ErrorClass::NotFound => ApiError::new(ErrorCode::NotFound, err.to_string()),
            ErrorClass::Forbidden => ApiError::new(ErrorCode::Forbidden, err.to_string()),
            ErrorClass::Internal => {
                tracing::error!(error = %err, "internal error");
                ApiError::new(ErrorCode::Internal, "internal error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}
