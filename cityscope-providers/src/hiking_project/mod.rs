//! Hiking Project trail search adapter

pub mod types;

use cityscope_core::{CityResult, Trail};
use secrecy::{ExposeSecret, SecretString};

use crate::client::{Auth, ProviderClient};
use crate::ProviderSettings;
use types::TrailsResponse;

pub const PROVIDER: &str = "hikingproject";

pub const DEFAULT_BASE_URL: &str = "https://www.hikingproject.com";

/// Search radius in miles.
pub const MAX_DISTANCE_MILES: u32 = 10;

pub struct HikingProjectClient {
    http: ProviderClient,
    api_key: SecretString,
}

impl HikingProjectClient {
    pub fn new(settings: &ProviderSettings) -> CityResult<Self> {
        Ok(Self {
            http: ProviderClient::new(PROVIDER, settings)?,
            api_key: settings.api_key.clone(),
        })
    }

    /// Trails near a coordinate.
    pub async fn trails_near(&self, latitude: f64, longitude: f64) -> CityResult<Vec<Trail>> {
        let lat = latitude.to_string();
        let lon = longitude.to_string();
        let max_distance = MAX_DISTANCE_MILES.to_string();

        let response: TrailsResponse = self
            .http
            .get_json(
                "/data/get-trails",
                &[
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("maxDistance", max_distance.as_str()),
                    ("key", self.api_key.expose_secret()),
                ],
                Auth::Query,
            )
            .await?;

        Ok(types::reshape(response)?)
    }
}

impl std::fmt::Debug for HikingProjectClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HikingProjectClient")
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
    async fn test_trails_near_passes_coordinates() -> CityResult<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/get-trails"))
            .and(query_param("lat", "47.6"))
            .and(query_param("lon", "-122.3"))
            .and(query_param("key", "trail-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "trails": [{
                    "name": "Discovery Park Loop",
                    "location": "Seattle, Washington",
                    "length": 2.8,
                    "stars": 4.5,
                    "starVotes": 12,
                    "summary": "Loop through forest and meadow.",
                    "url": "https://www.hikingproject.com/trail/1/discovery-park-loop",
                    "conditionStatus": "Unknown",
                    "conditionDate": "1970-01-01 00:00:00"
                }],
                "success": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = HikingProjectClient::new(&ProviderSettings::new("trail-key", server.uri()))?;
        let trails = client.trails_near(47.6, -122.3).await?;

        assert_eq!(trails.len(), 1);
        assert_eq!(trails[0].condition_date, "1970-01-01");
        assert_eq!(trails[0].condition_time, "00:00:00");
        Ok(())
    }
}
