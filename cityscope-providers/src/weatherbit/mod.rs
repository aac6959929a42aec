//! Weatherbit daily forecast adapter

pub mod types;

use cityscope_core::{CityResult, WeatherForecast};
use secrecy::{ExposeSecret, SecretString};

use crate::client::{Auth, ProviderClient};
use crate::ProviderSettings;
use types::ForecastResponse;

pub const PROVIDER: &str = "weatherbit";

pub const DEFAULT_BASE_URL: &str = "https://api.weatherbit.io";

pub struct WeatherbitClient {
    http: ProviderClient,
    api_key: SecretString,
}

impl WeatherbitClient {
    pub fn new(settings: &ProviderSettings) -> CityResult<Self> {
        Ok(Self {
            http: ProviderClient::new(PROVIDER, settings)?,
            api_key: settings.api_key.clone(),
        })
    }

    /// Daily forecast for a city name.
    pub async fn daily_forecast(&self, city: &str) -> CityResult<Vec<WeatherForecast>> {
        let response: ForecastResponse = self
            .http
            .get_json(
                "/v2.0/forecast/daily",
                &[("city", city), ("key", self.api_key.expose_secret())],
                Auth::Query,
            )
            .await?;

        Ok(types::reshape(response)?)
    }
}

impl std::fmt::Debug for WeatherbitClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherbitClient")
            .field("http", &self.http)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_daily_forecast() -> CityResult<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2.0/forecast/daily"))
            .and(query_param("city", "Seattle"))
            .and(query_param("key", "weather-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"valid_date": "2021-05-01", "weather": {"description": "Few clouds"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = WeatherbitClient::new(&ProviderSettings::new("weather-key", server.uri()))?;
        let forecasts = client.daily_forecast("Seattle").await?;

        assert_eq!(forecasts.len(), 1);
        assert_eq!(forecasts[0].forecast, "Few clouds");
        assert_eq!(forecasts[0].time, "Sat May 01 2021");
        Ok(())
    }
}
