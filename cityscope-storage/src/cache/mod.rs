//! Read-through lookup cache.
//!
//! [`ReadThroughCache`] combines a [`RecordStore`](crate::RecordStore) and a
//! [`RecordFetcher`](crate::RecordFetcher) for one record type. The location
//! endpoint is the first user; any other keyed provider record can be served
//! the same way by implementing [`CacheableRecord`](cityscope_core::CacheableRecord).

pub mod read_through;

pub use read_through::{CacheConfig, Lookup, LookupSource, ReadThroughCache};
