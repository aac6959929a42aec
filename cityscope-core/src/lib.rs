//! Cityscope Core - Records and Errors
//!
//! Shared record types for every provider the aggregator talks to, the error
//! taxonomy used across the workspace, and the [`CacheableRecord`] seam that
//! lets the cache-then-fetch orchestrator work over any keyed record.

pub mod error;
pub mod records;

pub use error::{CityError, CityResult, PersistenceError, ShapeError, UpstreamError};
pub use records::{
    movie_image_url, split_condition_date, LocationRecord, Movie, Restaurant, Trail,
    WeatherForecast, NO_PICTURE, TMDB_IMAGE_BASE,
};

/// A record that can be stored in, and served from, a lookup cache.
///
/// The key is the exact caller-supplied query text. No normalization is
/// applied anywhere: `"Seattle"` and `"seattle"` are distinct entries.
pub trait CacheableRecord: Clone + Send + Sync + 'static {
    /// Storage key for this record.
    fn cache_key(&self) -> &str;
}

impl CacheableRecord for LocationRecord {
    fn cache_key(&self) -> &str {
        &self.search_query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_cache_key_is_verbatim_query() {
        let record = LocationRecord::new("  Seattle ", "Seattle, WA", 47.6, -122.3);
        assert_eq!(record.cache_key(), "  Seattle ");
    }
}
