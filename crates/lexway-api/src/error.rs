//! API error types and JSON error response formatting.
//!
//! ApiError provides a consistent JSON error response format across all
//! endpoints, mapping internal errors to appropriate HTTP status codes.
//! Provider- and parse-level failures surface as server errors carrying
//! the underlying message; file-type validation fails before any provider
//! interaction with a client error.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use lexway_chat::ChatError;
use lexway_core::error::LexwayError;
use lexway_docs::DocsError;
use lexway_provider::ProviderError;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "bad_request").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - missing or invalid parameters.
    BadRequest(String),
    /// 415 Unsupported Media Type - upload MIME check failed.
    UnsupportedMediaType(String),
    /// 500 Internal Server Error - provider, parse, or store failure.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "unsupported_media_type",
                msg,
            ),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        let body = ErrorBody {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match &err {
            ChatError::EmptyMessage => ApiError::BadRequest(err.to_string()),
            ChatError::MalformedResponse { raw, .. } => {
                tracing::error!(raw = %raw, "Provider reply failed normalization");
                ApiError::Internal(err.to_string())
            }
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<DocsError> for ApiError {
    fn from(err: DocsError) -> Self {
        if let DocsError::MalformedResponse { raw, .. } = &err {
            tracing::error!(raw = %raw, "Provider reply failed normalization");
        }
        ApiError::Internal(err.to_string())
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        ApiError::Internal(format!("provider call failed: {}", err))
    }
}

impl From<LexwayError> for ApiError {
    fn from(err: LexwayError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
