//! Health Check Endpoints
//!
//! - /health/ping - Simple liveness check
//! - /health/ready - Lookup store connectivity check

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use cityscope_storage::RecordStore;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Reported in place of the store error, which is only logged.
pub const STORE_UNREACHABLE: &str = "store unreachable";

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HealthDetails>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDetails {
    pub store: ComponentHealth,
    pub version: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /health/ping - Simple pong response
pub async fn ping() -> impl IntoResponse {
    (StatusCode::OK, "pong")
}

/// GET /health/ready - Readiness check (store round trip)
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let start = std::time::Instant::now();

    let store = match state.locations.store().ping().await {
        Ok(()) => ComponentHealth {
            status: HealthStatus::Healthy,
            latency_ms: Some(start.elapsed().as_millis() as u64),
            error: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            ComponentHealth {
                status: HealthStatus::Unhealthy,
                latency_ms: None,
                error: Some(STORE_UNREACHABLE.to_string()),
            }
        }
    };

    let status = store.status;
    let response = HealthResponse {
        status,
        details: Some(HealthDetails {
            store,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.start_time.elapsed().as_secs(),
        }),
    };

    let status_code = if status == HealthStatus::Healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/ready", get(readiness))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() -> Result<(), serde_json::Error> {
        let response = HealthResponse {
            status: HealthStatus::Unhealthy,
            details: Some(HealthDetails {
                store: ComponentHealth {
                    status: HealthStatus::Unhealthy,
                    latency_ms: None,
                    error: Some(STORE_UNREACHABLE.to_string()),
                },
                version: "0.1.0".to_string(),
                uptime_seconds: 3,
            }),
        };

        let json = serde_json::to_value(&response)?;
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["details"]["store"]["error"], STORE_UNREACHABLE);
        assert!(json["details"]["store"].get("latency_ms").is_none());
        Ok(())
    }
}
