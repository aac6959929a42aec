//! API Configuration Module
//!
//! Server bind address, CORS, lookup coalescing and provider credentials.
//! Everything is loaded from environment variables with defaults suitable for
//! local development.

use std::net::SocketAddr;
use std::time::Duration;

use cityscope_providers::{
    hiking_project, locationiq, tmdb, weatherbit, yelp, ProviderSettings, DEFAULT_TIMEOUT,
};
use cityscope_storage::CacheConfig;

use crate::error::{ApiError, ApiResult};

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| !matches!(s.trim().to_lowercase().as_str(), "false" | "0" | "no" | "off"))
        .unwrap_or(default)
}

// ============================================================================
// SERVER CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: "3000".to_string(),
        }
    }
}

impl ServerConfig {
    /// Environment variables:
    /// - `CITYSCOPE_API_BIND`: bind host (default: 0.0.0.0)
    /// - `PORT`: listen port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("CITYSCOPE_API_BIND").unwrap_or(defaults.host),
            port: std::env::var("PORT").unwrap_or(defaults.port),
        }
    }

    pub fn bind_addr(&self) -> ApiResult<SocketAddr> {
        let port = self.port.parse::<u16>().map_err(|_| {
            ApiError::internal_error(format!("Invalid port value: {}", self.port))
        })?;

        let addr = format!("{}:{}", self.host, port);
        addr.parse::<SocketAddr>().map_err(|e| {
            ApiError::internal_error(format!("Invalid bind address {}: {}", addr, e))
        })
    }
}

// ============================================================================
// API CONFIGURATION
// ============================================================================

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins.
    pub cors_origins: Vec<String>,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    /// Collapse concurrent location lookups for the same city.
    pub coalesce_lookups: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            cors_max_age_secs: 86400,
            coalesce_lookups: true,
        }
    }
}

impl ApiConfig {
    /// Environment variables:
    /// - `CITYSCOPE_CORS_ORIGINS`: comma-separated allowed origins (empty = allow all)
    /// - `CITYSCOPE_CORS_MAX_AGE_SECS`: preflight cache duration (default: 86400)
    /// - `CITYSCOPE_COALESCE_LOOKUPS`: "true" or "false" (default: true)
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("CITYSCOPE_CORS_ORIGINS")
            .ok()
            .map(|s| parse_origins(&s))
            .unwrap_or_default();

        let cors_max_age_secs = std::env::var("CITYSCOPE_CORS_MAX_AGE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(86400);

        Self {
            cors_origins,
            cors_max_age_secs,
            coalesce_lookups: env_flag("CITYSCOPE_COALESCE_LOOKUPS", true),
        }
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new().with_coalescing(self.coalesce_lookups)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}

// ============================================================================
// PROVIDER CONFIGURATION
// ============================================================================

/// Credentials and endpoints for every upstream provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub geocode: ProviderSettings,
    pub weather: ProviderSettings,
    pub trails: ProviderSettings,
    pub movies: ProviderSettings,
    pub restaurants: ProviderSettings,
}

impl ProviderConfig {
    /// Environment variables, per provider:
    /// - `GEOCODE_API_KEY` / `CITYSCOPE_LOCATIONIQ_URL`
    /// - `WEATHER_API_KEY` / `CITYSCOPE_WEATHERBIT_URL`
    /// - `TRAIL_API_KEY` / `CITYSCOPE_HIKINGPROJECT_URL`
    /// - `MOVIE_API_KEY` / `CITYSCOPE_TMDB_URL`
    /// - `YELP_API_KEY` / `CITYSCOPE_YELP_URL`
    ///
    /// and `CITYSCOPE_UPSTREAM_TIMEOUT_SECS` (default: 10) for all of them.
    pub fn from_env() -> Self {
        let timeout = std::env::var("CITYSCOPE_UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        let load = |key_var: &str, url_var: &str, default_url: &str| {
            let api_key = std::env::var(key_var).unwrap_or_else(|_| {
                tracing::warn!(env = key_var, "Provider API key not set; requests will be rejected upstream");
                String::new()
            });
            let base_url = std::env::var(url_var).unwrap_or_else(|_| default_url.to_string());
            ProviderSettings::new(api_key, base_url).with_timeout(timeout)
        };

        Self {
            geocode: load("GEOCODE_API_KEY", "CITYSCOPE_LOCATIONIQ_URL", locationiq::DEFAULT_BASE_URL),
            weather: load("WEATHER_API_KEY", "CITYSCOPE_WEATHERBIT_URL", weatherbit::DEFAULT_BASE_URL),
            trails: load("TRAIL_API_KEY", "CITYSCOPE_HIKINGPROJECT_URL", hiking_project::DEFAULT_BASE_URL),
            movies: load("MOVIE_API_KEY", "CITYSCOPE_TMDB_URL", tmdb::DEFAULT_BASE_URL),
            restaurants: load("YELP_API_KEY", "CITYSCOPE_YELP_URL", yelp::DEFAULT_BASE_URL),
        }
    }

    /// Point every provider at one base URL, e.g. a local mock server.
    pub fn all_at(base_url: &str, api_key: &str) -> Self {
        let settings = || ProviderSettings::new(api_key, base_url);
        Self {
            geocode: settings(),
            weather: settings(),
            trails: settings(),
            movies: settings(),
            restaurants: settings(),
        }
    }
}
