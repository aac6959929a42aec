//! Restaurants route
//!
//! GET /yelp?search_query=...&page=N pages through restaurants five at a
//! time. `page` defaults to 1; values below 1 are treated as 1.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use cityscope_core::Restaurant;
use cityscope_providers::{yelp, YelpClient};
use serde::Deserialize;

use super::{observe_upstream, required};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct YelpParams {
    pub search_query: Option<String>,
    pub page: Option<String>,
}

fn page_number(page: Option<String>) -> ApiResult<u32> {
    match page.as_deref().map(str::trim) {
        None | Some("") => Ok(1),
        Some(raw) => raw
            .parse::<i64>()
            .map(|n| n.clamp(1, i64::from(u32::MAX)) as u32)
            .map_err(|_| ApiError::invalid_format("page", "an integer")),
    }
}

/// GET /yelp
pub async fn get_restaurants(
    State(client): State<Arc<YelpClient>>,
    Query(params): Query<YelpParams>,
) -> ApiResult<Json<Vec<Restaurant>>> {
    let location = required(params.search_query, "search_query")?;
    let page = page_number(params.page)?;

    let result = client.search(&location, page).await;
    observe_upstream(yelp::PROVIDER, result.is_ok());
    Ok(Json(result?))
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/yelp", get(get_restaurants))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_page_number() {
        assert_eq!(page_number(None).ok(), Some(1));
        assert_eq!(page_number(Some(String::new())).ok(), Some(1));
        assert_eq!(page_number(Some("3".to_string())).ok(), Some(3));
        assert_eq!(page_number(Some("0".to_string())).ok(), Some(1));
        assert_eq!(page_number(Some("-4".to_string())).ok(), Some(1));
        assert!(page_number(Some("two".to_string())).is_err());
    }

    proptest! {
        #[test]
        fn prop_positive_pages_pass_through(page in 1u32..100_000) {
            prop_assert_eq!(page_number(Some(page.to_string())).ok(), Some(page));
        }
    }
}
