//! Error types for cityscope operations

use thiserror::Error;

/// A provider payload that cannot be mapped onto a typed record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Missing or malformed field `{field}` in {provider} response")]
pub struct ShapeError {
    pub provider: String,
    pub field: String,
}

impl ShapeError {
    pub fn new(provider: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            field: field.into(),
        }
    }
}

/// Outbound provider failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("Request to {provider} failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("{provider} responded with status {status}")]
    BadStatus { provider: String, status: u16 },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

impl UpstreamError {
    /// Name of the provider that produced this error.
    pub fn provider(&self) -> &str {
        match self {
            UpstreamError::RequestFailed { provider, .. }
            | UpstreamError::BadStatus { provider, .. }
            | UpstreamError::InvalidResponse { provider, .. } => provider,
            UpstreamError::Shape(shape) => &shape.provider,
        }
    }
}

/// Lookup store failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("Store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Store query failed: {reason}")]
    QueryFailed { reason: String },
}

/// Master error type for all cityscope errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CityError {
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

impl From<ShapeError> for CityError {
    fn from(err: ShapeError) -> Self {
        CityError::Upstream(UpstreamError::Shape(err))
    }
}

/// Result type alias for cityscope operations.
pub type CityResult<T> = Result<T, CityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_error_display() {
        let err = ShapeError::new("tmdb", "results[3].title");
        let msg = err.to_string();
        assert!(msg.contains("tmdb"));
        assert!(msg.contains("results[3].title"));
    }

    #[test]
    fn test_shape_error_is_an_upstream_error() {
        let err = CityError::from(ShapeError::new("yelp", "businesses"));
        match err {
            CityError::Upstream(UpstreamError::Shape(shape)) => {
                assert_eq!(shape.field, "businesses");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_upstream_error_provider() {
        let err = UpstreamError::BadStatus {
            provider: "weatherbit".to_string(),
            status: 403,
        };
        assert_eq!(err.provider(), "weatherbit");
        assert!(err.to_string().contains("403"));

        let err = UpstreamError::from(ShapeError::new("locationiq", "lat"));
        assert_eq!(err.provider(), "locationiq");
    }

    #[test]
    fn test_city_error_from_variants() {
        let persistence = CityError::from(PersistenceError::Unavailable {
            reason: "pool closed".to_string(),
        });
        assert!(matches!(persistence, CityError::Persistence(_)));

        let upstream = CityError::from(UpstreamError::RequestFailed {
            provider: "locationiq".to_string(),
            reason: "connection refused".to_string(),
        });
        assert!(matches!(upstream, CityError::Upstream(_)));
    }
}
