//! Location route
//!
//! GET /location?city=... resolves through the lookup cache. The stored row
//! is returned on a hit; on a miss the geocoder is called and the response
//! does not wait for the write-back.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use cityscope_core::{CityError, LocationRecord};
use cityscope_providers::locationiq;
use cityscope_storage::{LocationCache, LookupSource};
use serde::Deserialize;

use super::{observe_upstream, required};
use crate::error::ApiResult;
use crate::state::AppState;
use crate::telemetry::metrics;

#[derive(Debug, Clone, Deserialize)]
pub struct LocationParams {
    pub city: Option<String>,
}

/// GET /location
pub async fn get_location(
    State(cache): State<LocationCache>,
    Query(params): Query<LocationParams>,
) -> ApiResult<Json<LocationRecord>> {
    let city = required(params.city, "city")?;
    let result = cache.resolve(&city).await;

    match &result {
        Ok(lookup) => {
            tracing::info!(city = %city, source = lookup.source.as_str(), "location resolved");
            if lookup.source == LookupSource::Upstream {
                observe_upstream(locationiq::PROVIDER, true);
            }
        }
        Err(CityError::Upstream(err)) => observe_upstream(err.provider(), false),
        Err(CityError::Persistence(_)) => {}
    }
    if let Some(metrics) = metrics() {
        metrics.record_lookup(result.as_ref().ok().map(|lookup| lookup.source));
    }

    Ok(Json(result?.into_record()))
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/location", get(get_location))
}
