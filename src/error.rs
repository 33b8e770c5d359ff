//! Gateway error types with HTTP status code mapping.
//!
//! [`QxError`] is the central error type for the gateway. Each variant maps
//! to a specific HTTP status code and structured JSON error response. The
//! ingestion webhook is the one exception: it answers with its own
//! `{"success": false, "error": ...}` contract (see
//! [`crate::api::handlers::webhook`]), so its handler converts errors
//! itself instead of relying on [`IntoResponse`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Structured JSON error response body.
///
/// All non-webhook error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid payload: expected JSON object or array",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status               |
/// |-----------|------------|---------------------------|
/// | 1000–1999 | Validation | 400 Bad Request           |
/// | 3000–3999 | Server     | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum QxError {
    /// Inbound webhook body is not valid JSON or has the wrong overall shape.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// A record is missing a required identifying field.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Outbound notification delivery failure. Reported per channel as a
    /// boolean flag, never propagated to ingestion callers.
    #[error("notification delivery failed: {0}")]
    Notification(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl QxError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidPayload(_) => 1001,
            Self::MissingField(_) => 1002,
            Self::Persistence(_) => 3001,
            Self::Notification(_) => 3002,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidPayload(_) | Self::MissingField(_) => StatusCode::BAD_REQUEST,
            Self::Persistence(_) | Self::Notification(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for QxError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_bad_request() {
        let err = QxError::InvalidPayload("not json".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), 1001);

        let err = QxError::MissingField("sourceId".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), 1002);
    }

    #[test]
    fn server_errors_map_to_internal_error() {
        let err = QxError::Persistence("connection refused".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), 3001);
    }

    #[test]
    fn display_includes_context() {
        let err = QxError::MissingField("txId".to_string());
        assert_eq!(err.to_string(), "missing required field: txId");
    }
}
