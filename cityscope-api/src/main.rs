//! Cityscope API Server Entry Point
//!
//! Bootstraps configuration, opens the lookup store, and starts the Axum
//! HTTP server.

use std::sync::Arc;

use axum::Router;
use cityscope_api::{
    create_api_router, ApiConfig, ApiError, ApiResult, AppState, DbClient, DbConfig,
    ProviderConfig, ServerConfig, StoreBackend,
};
use cityscope_core::LocationRecord;
use cityscope_storage::{InMemoryRecordStore, RecordStore};

use cityscope_api::telemetry::{init_tracing, TelemetryConfig};

async fn open_store(config: &DbConfig) -> ApiResult<Arc<dyn RecordStore<LocationRecord>>> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory lookup store; cached locations are lost on restart");
            Ok(Arc::new(InMemoryRecordStore::<LocationRecord>::new()))
        }
        StoreBackend::Postgres => {
            let db = DbClient::from_config(config)?;
            db.ensure_schema().await?;
            tracing::info!(pool_size = db.pool_size(), "Connected to lookup store");
            Ok(Arc::new(db))
        }
    }
}

#[tokio::main]
async fn main() -> ApiResult<()> {
    let telemetry_config = TelemetryConfig::default();
    init_tracing(&telemetry_config)?;

    let db_config = DbConfig::from_env();
    let store = open_store(&db_config).await?;

    let api_config = ApiConfig::from_env();
    let providers = ProviderConfig::from_env();
    let state = AppState::new(&providers, store, api_config.cache_config())?;

    let app: Router = create_api_router(state, &api_config);

    let addr = ServerConfig::from_env().bind_addr()?;
    tracing::info!(%addr, "Server is now listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
