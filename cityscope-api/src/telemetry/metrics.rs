//! Prometheus Metrics Definitions
//!
//! Registered once on first use and exposed at `/metrics` for scraping.

use axum::{http::StatusCode, response::IntoResponse};
use cityscope_storage::LookupSource;
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

use crate::error::{ApiError, ApiResult};

/// HTTP request latency buckets (seconds)
/// Covers: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s
const HTTP_LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0,
];

/// Global metrics instance
pub static METRICS: Lazy<ApiResult<CityscopeMetrics>> = Lazy::new(CityscopeMetrics::new);

/// The global metrics, or `None` if registration failed.
pub fn metrics() -> Option<&'static CityscopeMetrics> {
    METRICS.as_ref().ok()
}

#[derive(Clone)]
pub struct CityscopeMetrics {
    /// labels: method, path, status
    pub http_requests_total: CounterVec,

    /// labels: method, path
    pub http_request_duration_seconds: HistogramVec,

    /// labels: source (store, in_flight, upstream, error)
    pub location_lookups_total: CounterVec,

    /// labels: provider, status (success, error)
    pub upstream_requests_total: CounterVec,
}

impl CityscopeMetrics {
    /// Create and register all metrics with Prometheus.
    pub fn new() -> ApiResult<Self> {
        Ok(Self {
            http_requests_total: register_counter_vec!(
                "cityscope_http_requests_total",
                "Total number of HTTP requests",
                &["method", "path", "status"]
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register http_requests_total: {}", e)))?,

            http_request_duration_seconds: register_histogram_vec!(
                "cityscope_http_request_duration_seconds",
                "HTTP request duration in seconds",
                &["method", "path"],
                HTTP_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register http_request_duration_seconds: {}", e)))?,

            location_lookups_total: register_counter_vec!(
                "cityscope_location_lookups_total",
                "Location lookups by where the record came from",
                &["source"]
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register location_lookups_total: {}", e)))?,

            upstream_requests_total: register_counter_vec!(
                "cityscope_upstream_requests_total",
                "Outbound provider requests",
                &["provider", "status"]
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register upstream_requests_total: {}", e)))?,
        })
    }

    /// Record an HTTP request.
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    /// Record a location lookup. `None` means the lookup failed.
    pub fn record_lookup(&self, source: Option<LookupSource>) {
        let label = source.map(|s| s.as_str()).unwrap_or("error");
        self.location_lookups_total.with_label_values(&[label]).inc();
    }

    /// Record one outbound provider call.
    pub fn record_upstream(&self, provider: &str, success: bool) {
        let status = if success { "success" } else { "error" };
        self.upstream_requests_total
            .with_label_values(&[provider, status])
            .inc();
    }
}

/// Handler for GET /metrics.
pub async fn metrics_handler() -> impl IntoResponse {
    // Touch the lazy so the families exist even before the first request.
    let _ = metrics();

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                format!("Failed to encode metrics: {}", e).into_bytes(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registered() -> Result<&'static CityscopeMetrics, String> {
        METRICS
            .as_ref()
            .map_err(|e| format!("Metrics init failed: {}", e.message))
    }

    #[test]
    fn test_record_http_request() -> Result<(), String> {
        let metrics = registered()?;
        let before = metrics
            .http_requests_total
            .with_label_values(&["GET", "/metrics-test", "200"])
            .get();
        metrics.record_http_request("GET", "/metrics-test", 200, 0.015);
        let after = metrics
            .http_requests_total
            .with_label_values(&["GET", "/metrics-test", "200"])
            .get();
        assert_eq!(after - before, 1.0);
        Ok(())
    }

    #[test]
    fn test_record_lookup_sources() -> Result<(), String> {
        let metrics = registered()?;
        let error_before = metrics.location_lookups_total.with_label_values(&["error"]).get();
        metrics.record_lookup(Some(LookupSource::Store));
        metrics.record_lookup(None);
        assert!(metrics.location_lookups_total.with_label_values(&["store"]).get() >= 1.0);
        assert!(metrics.location_lookups_total.with_label_values(&["error"]).get() > error_before);
        Ok(())
    }

    #[test]
    fn test_record_upstream() -> Result<(), String> {
        let metrics = registered()?;
        metrics.record_upstream("test-provider", true);
        metrics.record_upstream("test-provider", false);
        assert!(metrics
            .upstream_requests_total
            .with_label_values(&["test-provider", "error"])
            .get()
            >= 1.0);
        Ok(())
    }
}
