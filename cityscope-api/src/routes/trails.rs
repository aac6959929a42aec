//! Trails route
//!
//! Coordinates arrive as query strings and must parse as floating point
//! numbers; anything else is a 400.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use cityscope_core::Trail;
use cityscope_providers::{hiking_project, HikingProjectClient};
use serde::Deserialize;

use super::{observe_upstream, required};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct TrailParams {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

fn coordinate(value: Option<String>, field: &str) -> ApiResult<f64> {
    required(value, field)?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ApiError::invalid_format(field, "a number"))
}

/// GET /trails
pub async fn get_trails(
    State(client): State<Arc<HikingProjectClient>>,
    Query(params): Query<TrailParams>,
) -> ApiResult<Json<Vec<Trail>>> {
    let latitude = coordinate(params.latitude, "latitude")?;
    let longitude = coordinate(params.longitude, "longitude")?;

    let result = client.trails_near(latitude, longitude).await;
    observe_upstream(hiking_project::PROVIDER, result.is_ok());
    Ok(Json(result?))
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/trails", get(get_trails))
}
