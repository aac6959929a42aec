//! HTTP routes
//!
//! `/location` goes through the lookup cache. The other data routes are a
//! single provider call each.

pub mod health;
pub mod location;
pub mod movies;
pub mod trails;
pub mod weather;
pub mod yelp;

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::telemetry::{metrics, metrics_handler, observability_middleware};

/// GET / - liveness banner
pub async fn hello() -> &'static str {
    "Hello World"
}

/// A query parameter that must be present and non-empty.
pub(crate) fn required(value: Option<String>, field: &str) -> ApiResult<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::missing_field(field))
}

/// Count one provider call in the upstream metrics.
pub(crate) fn observe_upstream(provider: &str, success: bool) {
    if let Some(metrics) = metrics() {
        metrics.record_upstream(provider, success);
    }
}

fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: allowing all origins");
        cors.allow_origin(Any).allow_headers(Any)
    } else {
        tracing::info!("CORS: allowing origins: {:?}", config.cors_origins);
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

/// Create the complete router with every route and the shared layers.
pub fn create_api_router(state: AppState, config: &ApiConfig) -> Router {
    Router::new()
        .route("/", get(hello))
        .merge(location::create_router())
        .merge(weather::create_router())
        .merge(trails::create_router())
        .merge(movies::create_router())
        .merge(yelp::create_router())
        .nest("/health", health::create_router())
        .route("/metrics", get(metrics_handler))
        .with_state(state)
        .layer(middleware::from_fn(observability_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(config))
}
