//! TMDB movie search payload

use cityscope_core::{movie_image_url, Movie, ShapeError};
use serde::Deserialize;

use super::PROVIDER;
use crate::require;

/// Most movies returned for one search.
pub const MAX_MOVIES: usize = 20;

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Option<Vec<RawMovie>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMovie {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
}

pub fn reshape(response: SearchResponse) -> Result<Vec<Movie>, ShapeError> {
    require(response.results, PROVIDER, "results")?
        .into_iter()
        .take(MAX_MOVIES)
        .enumerate()
        .map(|(i, raw)| {
            Ok(Movie {
                title: require(raw.title, PROVIDER, format!("results[{i}].title"))?,
                overview: raw.overview.unwrap_or_default(),
                average_votes: raw.vote_average.unwrap_or_default(),
                total_votes: raw.vote_count.unwrap_or_default(),
                image_url: movie_image_url(raw.poster_path.as_deref(), raw.backdrop_path.as_deref()),
                popularity: raw.popularity.unwrap_or_default(),
                released_on: raw.release_date.unwrap_or_default(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cityscope_core::NO_PICTURE;
    use serde_json::json;

    fn movie(title: &str, poster: Option<&str>, backdrop: Option<&str>) -> serde_json::Value {
        json!({
            "title": title,
            "overview": "A film.",
            "vote_average": 7.1,
            "vote_count": 5120,
            "poster_path": poster,
            "backdrop_path": backdrop,
            "popularity": 21.5,
            "release_date": "1993-06-25"
        })
    }

    fn response(results: Vec<serde_json::Value>) -> SearchResponse {
        serde_json::from_value(json!({"page": 1, "results": results})).expect("fixture should deserialize")
    }

    #[test]
    fn test_reshape_image_fallback() {
        let movies = reshape(response(vec![
            movie("Sleepless in Seattle", Some("/poster.jpg"), Some("/backdrop.jpg")),
            movie("Backdrop Only", None, Some("/backdrop.jpg")),
            movie("No Art", None, None),
        ]))
        .expect("should reshape");

        assert_eq!(movies[0].image_url, "https://image.tmdb.org/t/p/w500/poster.jpg");
        assert_eq!(movies[1].image_url, "https://image.tmdb.org/t/p/w500/backdrop.jpg");
        assert_eq!(movies[2].image_url, NO_PICTURE);
        assert_eq!(movies[0].average_votes, 7.1);
        assert_eq!(movies[0].total_votes, 5120);
        assert_eq!(movies[0].released_on, "1993-06-25");
    }

    #[test]
    fn test_reshape_caps_results() {
        let results = (0..25).map(|i| movie(&format!("Movie {i}"), None, None)).collect();
        let movies = reshape(response(results)).expect("should reshape");

        assert_eq!(movies.len(), MAX_MOVIES);
        assert_eq!(movies[19].title, "Movie 19");
    }

    #[test]
    fn test_reshape_requires_title() {
        let mut untitled = movie("x", None, None);
        untitled.as_object_mut().expect("object").remove("title");
        let err = reshape(response(vec![untitled])).unwrap_err();
        assert_eq!(err.field, "results[0].title");
    }
}
