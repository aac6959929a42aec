//! Movies route

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use cityscope_core::Movie;
use cityscope_providers::{tmdb, TmdbClient};
use serde::Deserialize;

use super::{observe_upstream, required};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct MovieParams {
    pub search_query: Option<String>,
}

/// GET /movies - up to 20 movies matching the query
pub async fn get_movies(
    State(client): State<Arc<TmdbClient>>,
    Query(params): Query<MovieParams>,
) -> ApiResult<Json<Vec<Movie>>> {
    let query = required(params.search_query, "search_query")?;
    let result = client.search(&query).await;
    observe_upstream(tmdb::PROVIDER, result.is_ok());
    Ok(Json(result?))
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/movies", get(get_movies))
}
