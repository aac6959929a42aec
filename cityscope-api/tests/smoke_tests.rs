//! Postgres-backed smoke tests for the lookup store
//!
//! Run with `--features db-tests` against a database reachable through
//! `DATABASE_URL` or the `CITYSCOPE_DB_*` variables.

#![cfg(feature = "db-tests")]

use cityscope_api::{ApiResult, DbClient, DbConfig};
use cityscope_core::LocationRecord;
use cityscope_storage::RecordStore;

fn test_db() -> ApiResult<DbClient> {
    let config = DbConfig::from_env();
    DbClient::from_config(&config)
}

fn unique_city(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{}-{}", prefix, nanos)
}

#[tokio::test]
async fn smoke_test_insert_then_find() -> ApiResult<()> {
    let db = test_db()?;
    db.ensure_schema().await?;
    db.ping().await?;

    let city = unique_city("smoke-city");
    assert!(db.find(&city).await?.is_empty());

    let record = LocationRecord::new(city.as_str(), "Smoke Test City", 12.5, -45.25);
    let stored = db.insert(&record).await?;
    assert_eq!(stored, record);

    let rows = db.find(&city).await?;
    assert_eq!(rows, vec![record]);
    Ok(())
}

#[tokio::test]
async fn smoke_test_duplicate_insert_rejected() -> ApiResult<()> {
    let db = test_db()?;
    db.ensure_schema().await?;

    let city = unique_city("smoke-dup");
    let record = LocationRecord::new(city.as_str(), "Duplicate City", 1.0, 2.0);
    db.insert(&record).await?;

    assert!(db.insert(&record).await.is_err());
    assert_eq!(db.find(&city).await?.len(), 1);
    Ok(())
}
