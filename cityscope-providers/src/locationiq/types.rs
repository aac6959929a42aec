//! LocationIQ forward-geocoding payload

use cityscope_core::{LocationRecord, ShapeError};
use serde::Deserialize;
use serde_json::Value;

use super::PROVIDER;
use crate::require;

/// One search hit. LocationIQ sends coordinates as JSON strings.
#[derive(Debug, Clone, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub lat: Option<Value>,
    #[serde(default)]
    pub lon: Option<Value>,
    #[serde(default)]
    pub display_name: Option<String>,
}

fn coordinate(value: Option<Value>, field: &str) -> Result<f64, ShapeError> {
    let parsed = match require(value, PROVIDER, format!("[0].{field}"))? {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.ok_or_else(|| ShapeError::new(PROVIDER, format!("[0].{field}")))
}

/// Build a location from the best (first) hit, keyed by the caller's query.
pub fn reshape(search_query: &str, places: Vec<Place>) -> Result<LocationRecord, ShapeError> {
    let place = require(places.into_iter().next(), PROVIDER, "[0]")?;

    Ok(LocationRecord {
        search_query: search_query.to_string(),
        formatted_query: require(place.display_name, PROVIDER, "[0].display_name")?,
        latitude: coordinate(place.lat, "lat")?,
        longitude: coordinate(place.lon, "lon")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn places(value: Value) -> Vec<Place> {
        serde_json::from_value(value).expect("fixture should deserialize")
    }

    #[test]
    fn test_reshape_first_place() {
        let raw = places(json!([
            {"lat": "47.6038321", "lon": "-122.3300624", "display_name": "Seattle, King County, Washington, USA"},
            {"lat": "0", "lon": "0", "display_name": "Elsewhere"}
        ]));

        let record = reshape("Seattle", raw).expect("should reshape");
        assert_eq!(record.search_query, "Seattle");
        assert_eq!(record.formatted_query, "Seattle, King County, Washington, USA");
        assert_eq!(record.latitude, 47.6038321);
        assert_eq!(record.longitude, -122.3300624);
    }

    #[test]
    fn test_reshape_accepts_numeric_coordinates() {
        let raw = places(json!([{"lat": 45.52, "lon": -122.67, "display_name": "Portland"}]));
        let record = reshape("portland", raw).expect("should reshape");
        assert_eq!(record.search_query, "portland");
        assert_eq!(record.latitude, 45.52);
    }

    #[test]
    fn test_reshape_empty_is_shape_error() {
        let err = reshape("Nowhere", Vec::new()).unwrap_err();
        assert_eq!(err.field, "[0]");
    }

    #[test]
    fn test_reshape_missing_or_bad_fields() {
        let raw = places(json!([{"lat": "47.6", "display_name": "Seattle"}]));
        assert_eq!(reshape("Seattle", raw).unwrap_err().field, "[0].lon");

        let raw = places(json!([{"lat": "north", "lon": "1", "display_name": "Seattle"}]));
        assert_eq!(reshape("Seattle", raw).unwrap_err().field, "[0].lat");

        let raw = places(json!([{"lat": "1", "lon": "1"}]));
        assert_eq!(reshape("Seattle", raw).unwrap_err().field, "[0].display_name");
    }
}
