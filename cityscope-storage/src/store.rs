//! Store and fetcher contracts for keyed records.
//!
//! A [`RecordStore`] is the durable side of a lookup cache: exact-match reads
//! by key and plain appends. A [`RecordFetcher`] is the live upstream that
//! produces a record for a key the store has not seen.

use std::sync::RwLock;

use async_trait::async_trait;
use cityscope_core::{CacheableRecord, CityResult, PersistenceError};

/// Durable lookup store for cacheable records.
#[async_trait]
pub trait RecordStore<R: CacheableRecord>: Send + Sync {
    /// Exact-match point lookup. Returns every stored row for `key`, in
    /// whatever order the store yields them.
    async fn find(&self, key: &str) -> CityResult<Vec<R>>;

    /// Append a new row. Does not check for an existing row with the same key.
    async fn insert(&self, record: &R) -> CityResult<R>;

    /// Round-trip check used by readiness probes.
    async fn ping(&self) -> CityResult<()> {
        Ok(())
    }
}

/// Live upstream source for a record.
#[async_trait]
pub trait RecordFetcher<R: CacheableRecord>: Send + Sync {
    /// Fetch and shape a fresh record for `key`.
    async fn fetch(&self, key: &str) -> CityResult<R>;
}

/// Append-only in-memory store.
///
/// Rows are returned in insertion order and duplicates are kept, matching the
/// contract a bare SQL table without constraints would give.
#[derive(Debug)]
pub struct InMemoryRecordStore<R> {
    rows: RwLock<Vec<R>>,
}

impl<R> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl<R: CacheableRecord> InMemoryRecordStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `rows`.
    pub fn with_rows(rows: impl IntoIterator<Item = R>) -> Self {
        Self {
            rows: RwLock::new(rows.into_iter().collect()),
        }
    }

    /// Total number of stored rows, duplicates included.
    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of stored rows for `key`.
    pub fn count_for(&self, key: &str) -> usize {
        self.rows
            .read()
            .map(|rows| rows.iter().filter(|r| r.cache_key() == key).count())
            .unwrap_or(0)
    }
}

fn lock_poisoned() -> PersistenceError {
    PersistenceError::Unavailable {
        reason: "in-memory store lock poisoned".to_string(),
    }
}

#[async_trait]
impl<R: CacheableRecord> RecordStore<R> for InMemoryRecordStore<R> {
    async fn find(&self, key: &str) -> CityResult<Vec<R>> {
        let rows = self.rows.read().map_err(|_| lock_poisoned())?;
        Ok(rows.iter().filter(|r| r.cache_key() == key).cloned().collect())
    }

    async fn insert(&self, record: &R) -> CityResult<R> {
        let mut rows = self.rows.write().map_err(|_| lock_poisoned())?;
        rows.push(record.clone());
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cityscope_core::LocationRecord;

    fn seattle() -> LocationRecord {
        LocationRecord::new("Seattle", "Seattle, WA, USA", 47.6038321, -122.3300624)
    }

    #[tokio::test]
    async fn test_find_is_exact_match() -> CityResult<()> {
        let store = InMemoryRecordStore::with_rows([seattle()]);

        assert_eq!(store.find("Seattle").await?.len(), 1);
        assert!(store.find("seattle").await?.is_empty());
        assert!(store.find("Seattle ").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_insert_does_not_deduplicate() -> CityResult<()> {
        let store = InMemoryRecordStore::new();
        store.insert(&seattle()).await?;
        store.insert(&seattle()).await?;

        assert_eq!(store.len(), 2);
        assert_eq!(store.count_for("Seattle"), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_find_preserves_insertion_order() -> CityResult<()> {
        let first = seattle();
        let mut second = seattle();
        second.formatted_query = "Seattle (second row)".to_string();

        let store = InMemoryRecordStore::new();
        store.insert(&first).await?;
        store.insert(&second).await?;

        let rows = store.find("Seattle").await?;
        assert_eq!(rows, vec![first, second]);
        Ok(())
    }
}
