//! Typed records returned by the HTTP surface.
//!
//! Field names are the wire names; every record serializes exactly as the
//! JSON body a client receives.

use serde::{Deserialize, Serialize};

/// Base URL for TMDB images at width 500.
pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

/// Sentinel image URL for movies without poster or backdrop art.
pub const NO_PICTURE: &str = "No Picture";

/// A geocoded place, keyed by the caller's raw query text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub search_query: String,
    pub formatted_query: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationRecord {
    pub fn new(
        search_query: impl Into<String>,
        formatted_query: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            search_query: search_query.into(),
            formatted_query: formatted_query.into(),
            latitude,
            longitude,
        }
    }
}

/// One day of forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherForecast {
    pub forecast: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    pub name: String,
    pub location: String,
    pub length: f64,
    pub stars: f64,
    pub star_votes: i64,
    pub summary: String,
    pub trail_url: String,
    pub conditions: String,
    pub condition_date: String,
    pub condition_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub overview: String,
    pub average_votes: f64,
    pub total_votes: i64,
    pub image_url: String,
    pub popularity: f64,
    pub released_on: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub name: String,
    pub image_url: String,
    pub price: Option<String>,
    pub rating: f64,
    pub url: String,
}

/// Split a combined `"<date> <time>"` string on its first space.
///
/// A value with no space yields the whole input as the date and an empty time.
pub fn split_condition_date(value: &str) -> (String, String) {
    match value.split_once(' ') {
        Some((date, time)) => (date.to_string(), time.to_string()),
        None => (value.to_string(), String::new()),
    }
}

/// Pick the image for a movie: poster, then backdrop, then [`NO_PICTURE`].
pub fn movie_image_url(poster_path: Option<&str>, backdrop_path: Option<&str>) -> String {
    poster_path
        .or(backdrop_path)
        .map(|path| format!("{}{}", TMDB_IMAGE_BASE, path))
        .unwrap_or_else(|| NO_PICTURE.to_string())
}
