//! Database Connection Pool Module
//!
//! PostgreSQL-backed lookup store using deadpool-postgres. The pool is the
//! single shared store handle; it is created at startup and passed to the
//! lookup cache explicitly.

use async_trait::async_trait;
use cityscope_core::{CityError, CityResult, LocationRecord, PersistenceError};
use cityscope_storage::RecordStore;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use std::time::Duration;
use tokio_postgres::{NoTls, Row};

use crate::error::{ApiError, ApiResult};

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Which lookup store the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// Process-local store. Rows are lost on restart.
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Some(StoreBackend::Postgres),
            "memory" | "in-memory" => Some(StoreBackend::Memory),
            _ => None,
        }
    }
}

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Full connection string. When set, it takes precedence over the
    /// individual fields below.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
    pub max_size: usize,
    pub timeout: Duration,
    pub backend: StoreBackend,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            dbname: "cityscope".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 16,
            timeout: Duration::from_secs(30),
            backend: StoreBackend::Postgres,
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    pub fn from_env() -> Self {
        let backend = match std::env::var("CITYSCOPE_STORE") {
            Ok(value) => StoreBackend::parse(&value).unwrap_or_else(|| {
                tracing::warn!(value, "Unknown CITYSCOPE_STORE value, using postgres");
                StoreBackend::Postgres
            }),
            Err(_) => StoreBackend::Postgres,
        };

        Self {
            url: std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            host: std::env::var("CITYSCOPE_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("CITYSCOPE_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5432),
            dbname: std::env::var("CITYSCOPE_DB_NAME").unwrap_or_else(|_| "cityscope".to_string()),
            user: std::env::var("CITYSCOPE_DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: std::env::var("CITYSCOPE_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("CITYSCOPE_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16),
            timeout: Duration::from_secs(
                std::env::var("CITYSCOPE_DB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            backend,
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> ApiResult<Pool> {
        let mut cfg = Config::new();
        match &self.url {
            Some(url) => cfg.url = Some(url.clone()),
            None => {
                cfg.host = Some(self.host.clone());
                cfg.port = Some(self.port);
                cfg.dbname = Some(self.dbname.clone());
                cfg.user = Some(self.user.clone());
                cfg.password = Some(self.password.clone());
            }
        }
        cfg.connect_timeout = Some(self.timeout);

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        cfg.pool = Some(PoolConfig::new(self.max_size));

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| ApiError::database_error(format!("Failed to create pool: {}", e)))?;

        Ok(pool)
    }
}

// ============================================================================
// DATABASE CLIENT WRAPPER
// ============================================================================

const CREATE_LOCATIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS locations (
    id SERIAL PRIMARY KEY,
    search_query TEXT NOT NULL UNIQUE,
    formatted_query TEXT NOT NULL,
    latitude DOUBLE PRECISION NOT NULL,
    longitude DOUBLE PRECISION NOT NULL
)";

const FIND_LOCATION: &str = "SELECT search_query, formatted_query, latitude, longitude \
     FROM locations WHERE search_query = $1";

const INSERT_LOCATION: &str = "INSERT INTO locations (search_query, formatted_query, latitude, longitude) \
     VALUES ($1, $2, $3, $4) \
     RETURNING search_query, formatted_query, latitude, longitude";

/// Postgres-backed lookup store.
#[derive(Clone)]
pub struct DbClient {
    pool: Pool,
}

impl DbClient {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a new database client from configuration.
    pub fn from_config(config: &DbConfig) -> ApiResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool))
    }

    /// Get the current pool size for observability.
    pub fn pool_size(&self) -> usize {
        self.pool.status().size
    }

    async fn get_conn(&self) -> CityResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(pool_error)
    }

    /// Create the `locations` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> CityResult<()> {
        let conn = self.get_conn().await?;
        conn.batch_execute(CREATE_LOCATIONS_TABLE)
            .await
            .map_err(query_error)?;
        tracing::info!("locations table ready");
        Ok(())
    }
}

fn location_from_row(row: &Row) -> CityResult<LocationRecord> {
    Ok(LocationRecord {
        search_query: row.try_get("search_query").map_err(query_error)?,
        formatted_query: row.try_get("formatted_query").map_err(query_error)?,
        latitude: row.try_get("latitude").map_err(query_error)?,
        longitude: row.try_get("longitude").map_err(query_error)?,
    })
}

#[async_trait]
impl RecordStore<LocationRecord> for DbClient {
    async fn find(&self, key: &str) -> CityResult<Vec<LocationRecord>> {
        let conn = self.get_conn().await?;
        let rows = conn.query(FIND_LOCATION, &[&key]).await.map_err(query_error)?;
        rows.iter().map(location_from_row).collect()
    }

    async fn insert(&self, record: &LocationRecord) -> CityResult<LocationRecord> {
        let conn = self.get_conn().await?;
        let row = conn
            .query_one(
                INSERT_LOCATION,
                &[
                    &record.search_query,
                    &record.formatted_query,
                    &record.latitude,
                    &record.longitude,
                ],
            )
            .await
            .map_err(query_error)?;
        location_from_row(&row)
    }

    async fn ping(&self) -> CityResult<()> {
        let conn = self.get_conn().await?;
        conn.simple_query("SELECT 1").await.map_err(query_error)?;
        Ok(())
    }
}

fn pool_error(err: deadpool_postgres::PoolError) -> CityError {
    tracing::error!("Connection pool error: {:?}", err);
    PersistenceError::Unavailable {
        reason: err.to_string(),
    }
    .into()
}

fn query_error(err: tokio_postgres::Error) -> CityError {
    tracing::error!("Database error: {:?}", err);
    PersistenceError::QueryFailed {
        reason: err.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_parse() {
        assert_eq!(StoreBackend::parse("postgres"), Some(StoreBackend::Postgres));
        assert_eq!(StoreBackend::parse(" Memory "), Some(StoreBackend::Memory));
        assert_eq!(StoreBackend::parse("redis"), None);
    }

    #[test]
    fn test_default_db_config() {
        let config = DbConfig::default();
        assert_eq!(config.max_size, 16);
        assert_eq!(config.port, 5432);
        assert_eq!(config.backend, StoreBackend::Postgres);
        assert!(config.url.is_none());
    }

    #[tokio::test]
    async fn test_pool_builds_without_connecting() -> ApiResult<()> {
        let config = DbConfig {
            url: Some("postgres://postgres@127.0.0.1:1/cityscope".to_string()),
            ..DbConfig::default()
        };
        let db = DbClient::from_config(&config)?;
        assert_eq!(db.pool_size(), 0);
        Ok(())
    }
}
