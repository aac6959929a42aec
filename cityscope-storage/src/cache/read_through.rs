//! Cache-then-fetch orchestration.
//!
//! Reads go to the store first. On a miss the fetcher is called, the fresh
//! record is returned immediately, and the write-back to the store runs on a
//! detached task. Write-back failures are logged and never reach the caller.
//!
//! With coalescing on, the lookup that claims a key's in-flight slot reads the
//! store once more before fetching, so a miss that raced a finished write-back
//! is served from the stored row.

use std::sync::{Arc, OnceLock};

use cityscope_core::{CacheableRecord, CityResult};
use dashmap::DashMap;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;

use crate::store::{RecordFetcher, RecordStore};

/// Configuration for the read-through cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Collapse concurrent misses for the same key into one upstream fetch.
    ///
    /// When disabled, concurrent misses each call the fetcher and each write
    /// a row.
    pub coalesce_in_flight: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            coalesce_in_flight: true,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable in-flight coalescing.
    pub fn with_coalescing(mut self, enabled: bool) -> Self {
        self.coalesce_in_flight = enabled;
        self
    }
}

/// Where a looked-up record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupSource {
    /// Served from a stored row.
    Store,
    /// Shared from a concurrent lookup that was already fetching the key.
    InFlight,
    /// Fetched from the provider by this lookup.
    Upstream,
}

impl LookupSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupSource::Store => "store",
            LookupSource::InFlight => "in_flight",
            LookupSource::Upstream => "upstream",
        }
    }
}

/// Result of [`ReadThroughCache::resolve`].
#[derive(Debug)]
pub struct Lookup<R> {
    pub record: R,
    pub source: LookupSource,
    /// Handle of the detached write-back, present only for `Upstream` lookups.
    pub write_back: Option<JoinHandle<()>>,
}

impl<R> Lookup<R> {
    /// Take the record, leaving any write-back running in the background.
    pub fn into_record(self) -> R {
        self.record
    }

    /// Wait for the write-back (if any) to settle, then return the record.
    pub async fn settle(self) -> R {
        let Lookup {
            record, write_back, ..
        } = self;
        if let Some(handle) = write_back {
            if let Err(err) = handle.await {
                tracing::warn!(error = %err, "cache write-back task did not complete");
            }
        }
        record
    }
}

type InFlightMap<R> = DashMap<String, Arc<OnceCell<R>>>;

/// Read-through cache over a durable store and a live fetcher.
///
/// # Example
///
/// ```ignore
/// let cache = ReadThroughCache::with_defaults(store, geocoder);
/// let location = cache.lookup("Seattle").await?;
/// ```
pub struct ReadThroughCache<R: CacheableRecord> {
    store: Arc<dyn RecordStore<R>>,
    fetcher: Arc<dyn RecordFetcher<R>>,
    in_flight: Arc<InFlightMap<R>>,
    config: CacheConfig,
}

impl<R: CacheableRecord> ReadThroughCache<R> {
    pub fn new(
        store: Arc<dyn RecordStore<R>>,
        fetcher: Arc<dyn RecordFetcher<R>>,
        config: CacheConfig,
    ) -> Self {
        Self {
            store,
            fetcher,
            in_flight: Arc::new(DashMap::new()),
            config,
        }
    }

    pub fn with_defaults(store: Arc<dyn RecordStore<R>>, fetcher: Arc<dyn RecordFetcher<R>>) -> Self {
        Self::new(store, fetcher, CacheConfig::default())
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn RecordStore<R>> {
        &self.store
    }

    /// Number of keys currently being fetched or written back.
    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    /// Look up `key`, fetching and writing back on a miss.
    pub async fn lookup(&self, key: &str) -> CityResult<R> {
        Ok(self.resolve(key).await?.into_record())
    }

    /// Like [`lookup`](Self::lookup), but also reports where the record came
    /// from and hands back the write-back task.
    ///
    /// A failed store read fails the lookup. A failed write-back does not.
    pub async fn resolve(&self, key: &str) -> CityResult<Lookup<R>> {
        if let Some(record) = self.store.find(key).await?.into_iter().next() {
            tracing::debug!(key, "lookup cache hit");
            return Ok(Lookup {
                record,
                source: LookupSource::Store,
                write_back: None,
            });
        }

        tracing::debug!(key, "lookup cache miss");

        if self.config.coalesce_in_flight {
            return self.fetch_coalesced(key).await;
        }

        let record = self.fetcher.fetch(key).await?;
        let write_back = self.spawn_write_back(key.to_string(), record.clone(), None);
        Ok(Lookup {
            record,
            source: LookupSource::Upstream,
            write_back: Some(write_back),
        })
    }

    async fn fetch_coalesced(&self, key: &str) -> CityResult<Lookup<R>> {
        let guard = InFlightGuard {
            in_flight: &*self.in_flight,
            key,
            cell: {
                let entry = self.in_flight.entry(key.to_string()).or_default();
                Arc::clone(entry.value())
            },
        };

        let origin = OnceLock::new();
        let record = guard
            .cell
            .get_or_try_init(|| async {
                // A fresh cell can follow a write-back that landed after the first read
                if let Some(record) = self.store.find(key).await?.into_iter().next() {
                    let _ = origin.set(LookupSource::Store);
                    return Ok(record);
                }
                let _ = origin.set(LookupSource::Upstream);
                self.fetcher.fetch(key).await
            })
            .await?
            .clone();

        match origin.get().copied() {
            None => {
                tracing::debug!(key, "joined in-flight lookup");
                Ok(Lookup {
                    record,
                    source: LookupSource::InFlight,
                    write_back: None,
                })
            }
            Some(LookupSource::Store) => {
                tracing::debug!(key, "lookup cache hit on re-read");
                self.in_flight
                    .remove_if(key, |_, current| Arc::ptr_eq(current, &guard.cell));
                Ok(Lookup {
                    record,
                    source: LookupSource::Store,
                    write_back: None,
                })
            }
            Some(_) => {
                let write_back =
                    self.spawn_write_back(key.to_string(), record.clone(), Some(Arc::clone(&guard.cell)));
                Ok(Lookup {
                    record,
                    source: LookupSource::Upstream,
                    write_back: Some(write_back),
                })
            }
        }
    }

    /// Persist `record` on a detached task. The in-flight entry for `key`, if
    /// any, is released once the insert settles either way.
    fn spawn_write_back(
        &self,
        key: String,
        record: R,
        cell: Option<Arc<OnceCell<R>>>,
    ) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let in_flight = Arc::clone(&self.in_flight);

        tokio::spawn(async move {
            match store.insert(&record).await {
                Ok(_) => tracing::debug!(key = %key, "cached upstream record"),
                Err(err) => tracing::warn!(key = %key, error = %err, "cache write-back failed"),
            }
            if let Some(cell) = cell {
                in_flight.remove_if(key.as_str(), |_, current| Arc::ptr_eq(current, &cell));
            }
        })
    }
}

/// Releases an in-flight entry whose cell never got a record, whether the
/// fetch failed or the lookup future was dropped mid-fetch.
struct InFlightGuard<'a, R> {
    in_flight: &'a InFlightMap<R>,
    key: &'a str,
    cell: Arc<OnceCell<R>>,
}

impl<R> Drop for InFlightGuard<'_, R> {
    fn drop(&mut self) {
        // Waiters still holding the cell take over the fetch and release it themselves
        self.in_flight.remove_if(self.key, |_, current| {
            Arc::ptr_eq(current, &self.cell) && !current.initialized() && Arc::strong_count(current) <= 2
        });
    }
}

impl<R: CacheableRecord> Clone for ReadThroughCache<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            fetcher: Arc::clone(&self.fetcher),
            in_flight: Arc::clone(&self.in_flight),
            config: self.config.clone(),
        }
    }
}
