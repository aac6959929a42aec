//! Weather route

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use cityscope_core::WeatherForecast;
use cityscope_providers::{weatherbit, WeatherbitClient};
use serde::Deserialize;

use super::{observe_upstream, required};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherParams {
    pub search_query: Option<String>,
}

/// GET /weather - daily forecast for a city
pub async fn get_weather(
    State(client): State<Arc<WeatherbitClient>>,
    Query(params): Query<WeatherParams>,
) -> ApiResult<Json<Vec<WeatherForecast>>> {
    let city = required(params.search_query, "search_query")?;
    let result = client.daily_forecast(&city).await;
    observe_upstream(weatherbit::PROVIDER, result.is_ok());
    Ok(Json(result?))
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/weather", get(get_weather))
}
