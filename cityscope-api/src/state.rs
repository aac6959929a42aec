//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use cityscope_core::{CityResult, LocationRecord};
use cityscope_providers::{
    HikingProjectClient, LocationIqClient, TmdbClient, WeatherbitClient, YelpClient,
};
use cityscope_storage::{CacheConfig, LocationCache, RecordStore};

use crate::config::ProviderConfig;
use crate::error::{ApiError, ApiResult};

/// Application-wide state shared across all routes.
///
/// The lookup store lives inside `locations`; it is the only state that
/// outlives a request.
#[derive(Clone)]
pub struct AppState {
    /// Cache-then-fetch geocoder over the lookup store.
    pub locations: LocationCache,
    pub weather: Arc<WeatherbitClient>,
    pub trails: Arc<HikingProjectClient>,
    pub movies: Arc<TmdbClient>,
    pub restaurants: Arc<YelpClient>,
    pub start_time: Instant,
}

crate::impl_from_ref!(LocationCache, locations);
crate::impl_from_ref!(Arc<WeatherbitClient>, weather);
crate::impl_from_ref!(Arc<HikingProjectClient>, trails);
crate::impl_from_ref!(Arc<TmdbClient>, movies);
crate::impl_from_ref!(Arc<YelpClient>, restaurants);

fn build<T>(provider: &str, client: CityResult<T>) -> ApiResult<Arc<T>> {
    client.map(Arc::new).map_err(|e| {
        ApiError::internal_error(format!("Failed to build {} client: {}", provider, e))
    })
}

impl AppState {
    pub fn new(
        providers: &ProviderConfig,
        store: Arc<dyn RecordStore<LocationRecord>>,
        cache_config: CacheConfig,
    ) -> ApiResult<Self> {
        let geocoder = build("geocode", LocationIqClient::new(&providers.geocode))?;

        Ok(Self {
            locations: LocationCache::new(store, geocoder, cache_config),
            weather: build("weather", WeatherbitClient::new(&providers.weather))?,
            trails: build("trails", HikingProjectClient::new(&providers.trails))?,
            movies: build("movies", TmdbClient::new(&providers.movies))?,
            restaurants: build("restaurants", YelpClient::new(&providers.restaurants))?,
            start_time: Instant::now(),
        })
    }
}
