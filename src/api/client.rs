use reqwest::{Client, ClientBuilder};
use tracing::debug;

use crate::api::models::{RawListing, SearchResponse};
use crate::config::{Config, REQUEST_TIMEOUT};
use crate::error::{AppError, Result};
use crate::searches::SearchDefinition;

/// Query parameters for one search, in the order the provider documents them.
pub fn query_params(search: &SearchDefinition) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("query", search.query.to_string()),
        ("page", "1".to_string()),
        ("num_pages", "1".to_string()),
        ("date_posted", "week".to_string()),
        ("remote_jobs_only", search.remote_only.to_string()),
    ];
    if !search.remote_only {
        params.push(("location", search.location.to_string()));
    }
    params
}

/// Thin client for the provider's `/search` endpoint. One is built per run
/// so connections are reused between searches.
pub struct SearchClient {
    http: Client,
    base_url: String,
    api_key: String,
    api_host: String,
}

impl SearchClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = ClientBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            api_host: config.api_host.clone(),
        })
    }

    /// Runs a single search and returns the `data` array of the response.
    ///
    /// Non-success statuses come back as [`AppError::HttpStatus`]; timeouts and
    /// connection failures as [`AppError::FetchError`]. The caller decides how
    /// to degrade.
    pub async fn fetch_listings(&self, search: &SearchDefinition) -> Result<Vec<RawListing>> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&query_params(search))
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.api_host)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Received search response");
        let parsed: SearchResponse = serde_json::from_str(&body)?;
        Ok(parsed.into_listings())
    }
}
