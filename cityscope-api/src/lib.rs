//! Cityscope API - HTTP Layer
//!
//! Axum server for the cityscope aggregator. `/location` is served through a
//! Postgres-backed lookup cache; weather, trails, movies and restaurants are
//! single provider calls reshaped into stable JSON records.

pub mod config;
pub mod db;
pub mod error;
pub mod macros;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use config::{ApiConfig, ProviderConfig, ServerConfig};
pub use db::{DbClient, DbConfig, StoreBackend};
pub use error::{ApiError, ApiResult, ErrorCode, SERVER_ERROR_MESSAGE};
pub use routes::create_api_router;
pub use state::AppState;
