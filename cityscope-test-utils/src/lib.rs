//! Cityscope Test Utilities
//!
//! Shared test infrastructure for the cityscope workspace:
//! - Counting and failing fakes for the store and fetcher seams
//! - Fixture records and raw provider payloads
//! - Proptest generators for query keys

pub use cityscope_core::{
    CityError, CityResult, LocationRecord, Movie, PersistenceError, Restaurant, Trail,
    UpstreamError, WeatherForecast,
};
pub use cityscope_storage::{InMemoryRecordStore, RecordFetcher, RecordStore};

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use proptest::prelude::*;
use serde_json::{json, Value};

// ============================================================================
// FAKES
// ============================================================================

/// Fetcher that geocodes every key to a fixed coordinate and counts calls.
#[derive(Debug)]
pub struct CountingFetcher {
    calls: AtomicUsize,
    latitude: f64,
    longitude: f64,
    fail: bool,
}

impl CountingFetcher {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            latitude: SEATTLE_LAT,
            longitude: SEATTLE_LON,
            fail: false,
        }
    }

    /// A fetcher whose every call fails with `UpstreamError::BadStatus`.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for CountingFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordFetcher<LocationRecord> for CountingFetcher {
    async fn fetch(&self, key: &str) -> CityResult<LocationRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(UpstreamError::BadStatus {
                provider: "counting".to_string(),
                status: 503,
            }
            .into());
        }
        Ok(LocationRecord::new(
            key,
            format!("{}, Fixture County", key),
            self.latitude,
            self.longitude,
        ))
    }
}

/// Store whose every call fails as if the database were down.
#[derive(Debug, Default)]
pub struct FailingStore {
    attempts: AtomicUsize,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of find, insert and ping calls attempted.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn unavailable(&self) -> CityError {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        PersistenceError::Unavailable {
            reason: "connection refused".to_string(),
        }
        .into()
    }
}

#[async_trait]
impl RecordStore<LocationRecord> for FailingStore {
    async fn find(&self, _key: &str) -> CityResult<Vec<LocationRecord>> {
        Err(self.unavailable())
    }

    async fn insert(&self, _record: &LocationRecord) -> CityResult<LocationRecord> {
        Err(self.unavailable())
    }

    async fn ping(&self) -> CityResult<()> {
        Err(self.unavailable())
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub const SEATTLE_LAT: f64 = 47.6038321;
pub const SEATTLE_LON: f64 = -122.3300624;
pub const SEATTLE_DISPLAY_NAME: &str = "Seattle, King County, Washington, USA";

/// The record a geocode of `"Seattle"` produces.
pub fn seattle_record() -> LocationRecord {
    LocationRecord::new("Seattle", SEATTLE_DISPLAY_NAME, SEATTLE_LAT, SEATTLE_LON)
}

/// LocationIQ search payload for Seattle. Coordinates arrive as strings.
pub fn locationiq_seattle_json() -> Value {
    json!([
        {
            "place_id": "235549103",
            "lat": SEATTLE_LAT.to_string(),
            "lon": SEATTLE_LON.to_string(),
            "display_name": SEATTLE_DISPLAY_NAME,
            "class": "place",
            "type": "city"
        }
    ])
}

/// Weatherbit daily forecast with two days.
pub fn weatherbit_forecast_json() -> Value {
    json!({
        "city_name": "Seattle",
        "data": [
            {"valid_date": "2021-05-01", "weather": {"description": "Few clouds", "code": 801}},
            {"valid_date": "2021-05-02", "weather": {"description": "Light rain", "code": 500}}
        ]
    })
}

/// Hiking Project trail list with one trail.
pub fn hiking_project_trails_json() -> Value {
    json!({
        "trails": [
            {
                "name": "Rattlesnake Ledge",
                "location": "North Bend, Washington",
                "length": 4.3,
                "stars": 4.4,
                "starVotes": 120,
                "summary": "A classic hike with views of Rattlesnake Lake.",
                "url": "https://www.hikingproject.com/trail/7001016/rattlesnake-ledge",
                "conditionStatus": "All Clear",
                "conditionDate": "2021-05-01 14:30:00"
            }
        ],
        "success": 1
    })
}

/// TMDB search payload with `count` movies, none with artwork.
pub fn tmdb_results_json(count: usize) -> Value {
    let results: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "title": format!("Seattle Story {}", i),
                "overview": "Rain, coffee, and a ferry.",
                "vote_average": 6.5,
                "vote_count": 100 + i,
                "poster_path": null,
                "backdrop_path": null,
                "popularity": 12.0,
                "release_date": "2001-09-01"
            })
        })
        .collect();
    json!({"page": 1, "results": results, "total_results": count})
}

/// Yelp business search payload with one business.
pub fn yelp_businesses_json() -> Value {
    json!({
        "businesses": [
            {
                "name": "Pike Place Chowder",
                "image_url": "https://s3-media.yelpcdn.com/bphoto/chowder.jpg",
                "price": "$$",
                "rating": 4.5,
                "url": "https://www.yelp.com/biz/pike-place-chowder-seattle"
            }
        ],
        "total": 1
    })
}

// ============================================================================
// GENERATORS
// ============================================================================

/// Query keys, including ones that differ only by case or whitespace.
pub fn arb_query() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z]{1,16}",
        "[A-Za-z]{1,8} [A-Za-z]{1,8}",
        " [A-Za-z]{1,8} ",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counting_fetcher_echoes_key() {
        let fetcher = CountingFetcher::new();
        let record = fetcher.fetch("Tacoma").await.expect("fetch should succeed");

        assert_eq!(record.search_query, "Tacoma");
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_failing_store_counts_attempts() {
        let store = FailingStore::new();
        assert!(store.find("Seattle").await.is_err());
        assert!(store.insert(&seattle_record()).await.is_err());
        assert_eq!(store.attempts(), 2);
    }
}
