//! Weatherbit daily forecast payload

use chrono::NaiveDate;
use cityscope_core::{ShapeError, WeatherForecast};
use serde::Deserialize;

use super::PROVIDER;
use crate::require;

/// Display format for forecast days, e.g. `Sat May 01 2021`.
pub const FORECAST_DATE_FORMAT: &str = "%a %b %d %Y";

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub data: Option<Vec<DailyForecast>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyForecast {
    #[serde(default)]
    pub valid_date: Option<String>,
    #[serde(default)]
    pub weather: Option<Conditions>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Conditions {
    #[serde(default)]
    pub description: Option<String>,
}

pub fn reshape(response: ForecastResponse) -> Result<Vec<WeatherForecast>, ShapeError> {
    let days = require(response.data, PROVIDER, "data")?;

    days.into_iter()
        .enumerate()
        .map(|(i, day)| {
            let valid_date = require(day.valid_date, PROVIDER, format!("data[{i}].valid_date"))?;
            let date = NaiveDate::parse_from_str(&valid_date, "%Y-%m-%d")
                .map_err(|_| ShapeError::new(PROVIDER, format!("data[{i}].valid_date")))?;
            let forecast = day
                .weather
                .and_then(|w| w.description)
                .ok_or_else(|| ShapeError::new(PROVIDER, format!("data[{i}].weather.description")))?;

            Ok(WeatherForecast {
                forecast,
                time: date.format(FORECAST_DATE_FORMAT).to_string(),
            })
        })
        .collect()
}
