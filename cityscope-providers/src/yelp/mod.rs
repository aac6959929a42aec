//! Yelp business search adapter
//!
//! Results are paged five at a time; page `n` (1-based) starts at offset
//! `(n - 1) * 5`.

pub mod types;

use cityscope_core::{CityResult, Restaurant};
use secrecy::SecretString;

use crate::client::{Auth, ProviderClient};
use crate::ProviderSettings;
use types::SearchResponse;

pub const PROVIDER: &str = "yelp";

pub const DEFAULT_BASE_URL: &str = "https://api.yelp.com";

/// Restaurants per page.
pub const PAGE_SIZE: u32 = 5;

/// Upstream offset for a 1-based page number. Pages below 1 are page 1.
pub fn page_offset(page: u32) -> u32 {
    page.max(1).saturating_sub(1).saturating_mul(PAGE_SIZE)
}

pub struct YelpClient {
    http: ProviderClient,
    api_key: SecretString,
}

impl YelpClient {
    pub fn new(settings: &ProviderSettings) -> CityResult<Self> {
        Ok(Self {
            http: ProviderClient::new(PROVIDER, settings)?,
            api_key: settings.api_key.clone(),
        })
    }

    /// One page of restaurants near `location`.
    pub async fn search(&self, location: &str, page: u32) -> CityResult<Vec<Restaurant>> {
        let limit = PAGE_SIZE.to_string();
        let offset = page_offset(page).to_string();

        let response: SearchResponse = self
            .http
            .get_json(
                "/v3/businesses/search",
                &[
                    ("location", location),
                    ("limit", limit.as_str()),
                    ("offset", offset.as_str()),
                ],
                Auth::Bearer(&self.api_key),
            )
            .await?;

        Ok(types::reshape(response)?)
    }
}

impl std::fmt::Debug for YelpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YelpClient")
            .field("http", &self.http)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
