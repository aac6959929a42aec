//! TMDB movie search adapter

pub mod types;

use cityscope_core::{CityResult, Movie};
use secrecy::{ExposeSecret, SecretString};

use crate::client::{Auth, ProviderClient};
use crate::ProviderSettings;
use types::SearchResponse;

pub const PROVIDER: &str = "tmdb";

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org";

pub struct TmdbClient {
    http: ProviderClient,
    api_key: SecretString,
}

impl TmdbClient {
    pub fn new(settings: &ProviderSettings) -> CityResult<Self> {
        Ok(Self {
            http: ProviderClient::new(PROVIDER, settings)?,
            api_key: settings.api_key.clone(),
        })
    }

    /// Movies matching `query`, at most [`types::MAX_MOVIES`].
    pub async fn search(&self, query: &str) -> CityResult<Vec<Movie>> {
        let response: SearchResponse = self
            .http
            .get_json(
                "/3/search/movie",
                &[("api_key", self.api_key.expose_secret()), ("query", query)],
                Auth::Query,
            )
            .await?;

        Ok(types::reshape(response)?)
    }
}

impl std::fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClient")
            .field("http", &self.http)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
