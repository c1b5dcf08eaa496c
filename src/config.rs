use std::env;
use std::path::PathBuf;
use std::time::Duration;
use crate::error::{AppError, Result};

pub const API_HOST: &str = "jsearch.p.rapidapi.com";
pub const API_KEY_VAR: &str = "RAPIDAPI_KEY";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
pub const REQUEST_DELAY: Duration = Duration::from_secs(2);
pub const CUTOFF_HOURS: i64 = 48;
pub const OUTPUT_FILE: &str = "jobs.json";

#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub api_host: String,
    /// Pause after every search request, successful or not.
    pub request_delay: Duration,
    /// Listings posted before `run start - cutoff` are dropped.
    pub cutoff: chrono::Duration,
    pub output_path: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::with_api_key(env::var(API_KEY_VAR).ok())
    }

    /// Builds the default configuration around a credential. A missing or
    /// empty key is rejected here, before anything touches the network. Any
    /// other value is sent exactly as given.
    pub fn with_api_key(api_key: Option<String>) -> Result<Self> {
        let api_key = api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                AppError::ConfigError(format!("{} environment variable is not set", API_KEY_VAR))
            })?;

        Ok(Config {
            api_key,
            base_url: format!("https://{}/search", API_HOST),
            api_host: API_HOST.to_string(),
            request_delay: REQUEST_DELAY,
            cutoff: chrono::Duration::hours(CUTOFF_HOURS),
            output_path: PathBuf::from(OUTPUT_FILE),
        })
    }
}
