//! Yelp business search payload

use cityscope_core::{Restaurant, ShapeError};
use serde::Deserialize;

use super::PROVIDER;
use crate::require;

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub businesses: Option<Vec<RawBusiness>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBusiness {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
}

pub fn reshape(response: SearchResponse) -> Result<Vec<Restaurant>, ShapeError> {
    require(response.businesses, PROVIDER, "businesses")?
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            Ok(Restaurant {
                name: require(raw.name, PROVIDER, format!("businesses[{i}].name"))?,
                image_url: raw.image_url.unwrap_or_default(),
                price: raw.price,
                rating: require(raw.rating, PROVIDER, format!("businesses[{i}].rating"))?,
                url: require(raw.url, PROVIDER, format!("businesses[{i}].url"))?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reshape_businesses() {
        let raw: SearchResponse = serde_json::from_value(json!({
            "businesses": [
                {"name": "Pike Place Chowder", "image_url": "https://s3-media.yelp.com/a.jpg", "price": "$$", "rating": 4.5, "url": "https://www.yelp.com/biz/a"},
                {"name": "No Price Diner", "rating": 3.0, "url": "https://www.yelp.com/biz/b"}
            ],
            "total": 2
        }))
        .expect("fixture should deserialize");

        let restaurants = reshape(raw).expect("should reshape");
        assert_eq!(restaurants[0].price.as_deref(), Some("$$"));
        assert_eq!(restaurants[0].rating, 4.5);
        assert_eq!(restaurants[1].price, None);
        assert_eq!(restaurants[1].image_url, "");
    }

    #[test]
    fn test_reshape_requires_url() {
        let raw: SearchResponse = serde_json::from_value(json!({
            "businesses": [{"name": "Mystery Spot", "rating": 2.0}]
        }))
        .expect("fixture should deserialize");

        assert_eq!(reshape(raw).unwrap_err().field, "businesses[0].url");
    }
}
