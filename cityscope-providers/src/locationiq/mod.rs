//! LocationIQ geocoding adapter
//!
//! Resolves a free-text city query to coordinates. This is the upstream
//! behind the cached `/location` endpoint.

pub mod types;

use async_trait::async_trait;
use cityscope_core::{CityResult, LocationRecord};
use cityscope_storage::RecordFetcher;
use secrecy::{ExposeSecret, SecretString};

use crate::client::{Auth, ProviderClient};
use crate::ProviderSettings;
use types::Place;

pub const PROVIDER: &str = "locationiq";

/// Default public endpoint.
pub const DEFAULT_BASE_URL: &str = "https://us1.locationiq.com";

pub struct LocationIqClient {
    http: ProviderClient,
    api_key: SecretString,
}

impl LocationIqClient {
    pub fn new(settings: &ProviderSettings) -> CityResult<Self> {
        Ok(Self {
            http: ProviderClient::new(PROVIDER, settings)?,
            api_key: settings.api_key.clone(),
        })
    }

    /// Geocode `query` and shape the first hit.
    pub async fn geocode(&self, query: &str) -> CityResult<LocationRecord> {
        let places: Vec<Place> = self
            .http
            .get_json(
                "/v1/search.php",
                &[
                    ("key", self.api_key.expose_secret()),
                    ("q", query),
                    ("format", "json"),
                ],
                Auth::Query,
            )
            .await?;

        let record = types::reshape(query, places)?;
        tracing::info!(query, formatted = %record.formatted_query, "geocoded location");
        Ok(record)
    }
}

#[async_trait]
impl RecordFetcher<LocationRecord> for LocationIqClient {
    async fn fetch(&self, key: &str) -> CityResult<LocationRecord> {
        self.geocode(key).await
    }
}

impl std::fmt::Debug for LocationIqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationIqClient")
            .field("http", &self.http)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cityscope_core::{CityError, UpstreamError};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> LocationIqClient {
        LocationIqClient::new(&ProviderSettings::new("geo-key", server.uri())).expect("client should build")
    }

    #[tokio::test]
    async fn test_geocode_sends_credential_and_query() -> CityResult<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search.php"))
            .and(query_param("key", "geo-key"))
            .and(query_param("q", "Seattle"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"lat": "47.6038321", "lon": "-122.3300624", "display_name": "Seattle, King County, Washington, USA"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let record = client_for(&server).fetch("Seattle").await?;
        assert_eq!(record.search_query, "Seattle");
        assert_eq!(record.latitude, 47.6038321);
        Ok(())
    }

    #[tokio::test]
    async fn test_geocode_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search.php"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({"error": "Unable to geocode"})))
            .mount(&server)
            .await;

        let result = client_for(&server).geocode("Atlantis").await;
        assert_eq!(
            result,
            Err(CityError::Upstream(UpstreamError::BadStatus {
                provider: "locationiq".to_string(),
                status: 404,
            }))
        );
    }

    #[tokio::test]
    async fn test_geocode_unparseable_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let result = client_for(&server).geocode("Seattle").await;
        assert!(matches!(
            result,
            Err(CityError::Upstream(UpstreamError::InvalidResponse { .. }))
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = LocationIqClient::new(&ProviderSettings::new("super-secret", DEFAULT_BASE_URL))
            .expect("client should build");
        let debug = format!("{:?}", client);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
