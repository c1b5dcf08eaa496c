use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Top-level body of a `/search` response. Only `data` is read, and each
/// entry is decoded on its own so one bad listing does not sink the batch.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub data: Option<Vec<Value>>,
}

/// One job as the provider returns it. Every field may be missing or null.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawListing {
    pub job_id: Option<String>,
    pub job_title: Option<String>,
    pub employer_name: Option<String>,
    pub employer_logo: Option<String>,
    pub job_is_remote: Option<bool>,
    pub job_city: Option<String>,
    pub job_state: Option<String>,
    pub job_posted_at_datetime_utc: Option<String>,
    pub job_min_salary: Option<f64>,
    pub job_max_salary: Option<f64>,
    pub job_salary_period: Option<String>,
    pub job_description: Option<String>,
    pub job_apply_link: Option<String>,
}

impl SearchResponse {
    /// Entries that do not fit [`RawListing`] are logged and skipped.
    pub fn into_listings(self) -> Vec<RawListing> {
        self.data
            .unwrap_or_default()
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<RawListing>(entry) {
                Ok(listing) => Some(listing),
                Err(e) => {
                    warn!("Skipping malformed listing: {}", e);
                    None
                }
            })
            .collect()
    }
}
