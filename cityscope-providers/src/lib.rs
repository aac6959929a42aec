//! Provider adapters
//!
//! One module per third-party API. Each adapter issues a single outbound
//! request through [`ProviderClient`] and reshapes the raw payload (declared in
//! the module's `types.rs`) into a typed record from `cityscope-core`.
//! Adapters are stateless and never retry.

pub mod client;
pub mod hiking_project;
pub mod locationiq;
pub mod tmdb;
pub mod weatherbit;
pub mod yelp;

use std::time::Duration;

use cityscope_core::{CityError, ShapeError, UpstreamError};
use secrecy::SecretString;

pub use client::ProviderClient;
pub use hiking_project::HikingProjectClient;
pub use locationiq::LocationIqClient;
pub use tmdb::TmdbClient;
pub use weatherbit::WeatherbitClient;
pub use yelp::YelpClient;

/// Default timeout for a single upstream request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for one provider.
#[derive(Clone)]
pub struct ProviderSettings {
    pub api_key: SecretString,
    pub base_url: String,
    pub timeout: Duration,
}

impl ProviderSettings {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let api_key: String = api_key.into();
        Self {
            api_key: SecretString::new(api_key.into_boxed_str()),
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

pub(crate) fn request_failed(provider: &str, reason: impl std::fmt::Display) -> CityError {
    UpstreamError::RequestFailed {
        provider: provider.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

pub(crate) fn bad_status(provider: &str, status: u16) -> CityError {
    UpstreamError::BadStatus {
        provider: provider.to_string(),
        status,
    }
    .into()
}

pub(crate) fn invalid_response(provider: &str, reason: impl std::fmt::Display) -> CityError {
    UpstreamError::InvalidResponse {
        provider: provider.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

/// Unwrap a required raw field or report which one was missing.
pub(crate) fn require<T>(value: Option<T>, provider: &str, field: impl Into<String>) -> Result<T, ShapeError> {
    value.ok_or_else(|| ShapeError::new(provider, field))
}
