//! Error Types for the cityscope API
//!
//! - ApiError struct carrying a code and a message
//! - ErrorCode enum for categorizing errors
//! - IntoResponse implementation for Axum HTTP responses
//!
//! Responses are plain text. Server-side failures never leak their cause to
//! the client: the detail is logged and a static message is returned.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use cityscope_core::{CityError, PersistenceError, UpstreamError};
use std::fmt;

/// Body sent for every 5xx response.
pub const SERVER_ERROR_MESSAGE: &str = "Sorry, something went wrong";

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // ========================================================================
    // Validation Errors (400)
    // ========================================================================
    /// Required query parameter is missing or empty
    MissingField,

    /// Query parameter could not be parsed
    InvalidFormat,

    // ========================================================================
    // Server Errors (500, 503)
    // ========================================================================
    /// A third-party provider call failed
    UpstreamFailed,

    /// Lookup store read failed
    DatabaseError,

    /// Lookup store cannot be reached at all
    ServiceUnavailable,

    /// Internal server error
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::MissingField | ErrorCode::InvalidFormat => StatusCode::BAD_REQUEST,

            // A store that is down fails the request like any other server
            // error; 503 is reserved for the readiness probe.
            ErrorCode::UpstreamFailed
            | ErrorCode::DatabaseError
            | ErrorCode::ServiceUnavailable
            | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Error returned by every API handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    /// Create a MissingField error.
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingField,
            format!("Missing required query parameter `{}`", field),
        )
    }

    /// Create an InvalidFormat error.
    pub fn invalid_format(field: &str, expected: &str) -> Self {
        Self::new(
            ErrorCode::InvalidFormat,
            format!("Query parameter `{}` must be {}", field, expected),
        )
    }

    /// Create a DatabaseError.
    pub fn database_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Create an InternalError.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Text sent to the client.
    pub fn public_message(&self) -> &str {
        if self.status_code().is_server_error() {
            SERVER_ERROR_MESSAGE
        } else {
            &self.message
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.public_message().to_string(),
        )
            .into_response()
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

/// Convert a domain failure into an ApiError, logging the full cause.
impl From<CityError> for ApiError {
    fn from(err: CityError) -> Self {
        match &err {
            CityError::Upstream(upstream) => {
                tracing::error!(provider = upstream.provider(), error = %upstream, "Upstream provider failed");
                ApiError::new(ErrorCode::UpstreamFailed, err.to_string())
            }
            CityError::Persistence(PersistenceError::Unavailable { .. }) => {
                tracing::error!(error = %err, "Lookup store unavailable");
                ApiError::new(ErrorCode::ServiceUnavailable, err.to_string())
            }
            CityError::Persistence(PersistenceError::QueryFailed { .. }) => {
                tracing::error!(error = %err, "Lookup store query failed");
                ApiError::database_error(err.to_string())
            }
        }
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        CityError::from(err).into()
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use cityscope_core::ShapeError;

    #[test]
    fn test_validation_errors_are_bad_request() {
        assert_eq!(ApiError::missing_field("city").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::invalid_format("page", "a positive integer").status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_upstream_error_hides_cause() {
        let err: ApiError = CityError::from(ShapeError::new("tmdb", "results[0].title")).into();

        assert_eq!(err.code, ErrorCode::UpstreamFailed);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message.contains("results[0].title"));
        assert_eq!(err.public_message(), SERVER_ERROR_MESSAGE);
    }

    #[test]
    fn test_persistence_errors_are_server_errors() {
        let unavailable: ApiError = CityError::from(PersistenceError::Unavailable {
            reason: "pool closed".to_string(),
        })
        .into();
        let failed: ApiError = CityError::from(PersistenceError::QueryFailed {
            reason: "syntax error".to_string(),
        })
        .into();

        assert_eq!(unavailable.code, ErrorCode::ServiceUnavailable);
        assert_eq!(failed.code, ErrorCode::DatabaseError);
        assert_eq!(unavailable.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(failed.public_message(), SERVER_ERROR_MESSAGE);
    }

    #[test]
    fn test_client_error_keeps_message() {
        let err = ApiError::missing_field("search_query");
        assert!(err.public_message().contains("search_query"));
    }
}
