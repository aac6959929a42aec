//! Shared HTTP client for provider adapters

use cityscope_core::CityResult;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::{bad_status, invalid_response, request_failed, ProviderSettings};

/// How a request carries its credential.
#[derive(Debug, Clone, Copy)]
pub enum Auth<'a> {
    /// Credential travels as a query parameter (already in the query list).
    Query,
    /// `Authorization: Bearer <token>`.
    Bearer(&'a SecretString),
}

/// One provider's base URL plus a pooled reqwest client.
#[derive(Clone)]
pub struct ProviderClient {
    client: Client,
    base_url: String,
    provider: &'static str,
}

impl ProviderClient {
    pub fn new(provider: &'static str, settings: &ProviderSettings) -> CityResult<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("cityscope/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| request_failed(provider, format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            provider,
        })
    }

    /// Issue one GET and decode the JSON body.
    ///
    /// Transport errors, non-2xx statuses and undecodable bodies each map to
    /// their own `UpstreamError` variant. Request URLs are stripped from error
    /// messages since they may carry the credential.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        auth: Auth<'_>,
    ) -> CityResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(&url).query(query);
        if let Auth::Bearer(token) = auth {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            let e = e.without_url();
            tracing::warn!(provider = self.provider, error = %e, "upstream request failed");
            request_failed(self.provider, e)
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                provider = self.provider,
                status = status.as_u16(),
                "upstream returned error status"
            );
            return Err(bad_status(self.provider, status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| invalid_response(self.provider, format!("Failed to parse response: {}", e.without_url())))
    }
}

impl std::fmt::Debug for ProviderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderClient")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .finish()
    }
}
