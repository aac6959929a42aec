//! Cityscope Telemetry
//!
//! Structured logging through `tracing` and Prometheus metrics for the API
//! layer.

pub mod metrics;
pub mod middleware;
pub mod tracer;

pub use metrics::{metrics, metrics_handler, CityscopeMetrics, METRICS};
pub use middleware::observability_middleware;
pub use tracer::{init_tracing, LogFormat, TelemetryConfig};
