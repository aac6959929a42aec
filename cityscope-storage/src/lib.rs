//! Cityscope Storage
//!
//! Lookup store contract, an in-memory store, and the cache-then-fetch
//! orchestrator used by the location endpoint.

pub mod cache;
pub mod store;

pub use cache::{CacheConfig, Lookup, LookupSource, ReadThroughCache};
pub use store::{InMemoryRecordStore, RecordFetcher, RecordStore};

use cityscope_core::LocationRecord;

/// Cache-then-fetch orchestrator for geocoded locations.
pub type LocationCache = ReadThroughCache<LocationRecord>;
