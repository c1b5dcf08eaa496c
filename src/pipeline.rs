use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::api::client::SearchClient;
use crate::api::models::RawListing;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::normalize::{NormalizedListing, normalize_listings};
use crate::output::RunOutput;
use crate::searches::{SEARCHES, SearchDefinition};

/// Everything one run accumulates across searches.
#[derive(Debug)]
pub struct RunAccumulator {
    cutoff: DateTime<Utc>,
    seen_ids: HashSet<String>,
    jobs: Vec<NormalizedListing>,
}

impl RunAccumulator {
    pub fn new(started_at: DateTime<Utc>, cutoff: chrono::Duration) -> Self {
        Self {
            cutoff: started_at - cutoff,
            seen_ids: HashSet::new(),
            jobs: Vec::new(),
        }
    }

    /// Returns how many listings were accepted from this batch.
    pub fn absorb(&mut self, raw: Vec<RawListing>) -> usize {
        let accepted = normalize_listings(raw, &mut self.seen_ids, self.cutoff);
        let count = accepted.len();
        self.jobs.extend(accepted);
        count
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn finish(self, finished_at: DateTime<Utc>) -> RunOutput {
        RunOutput::new(self.jobs, finished_at)
    }
}

/// Fetches one search, degrading any failure to an empty batch.
async fn fetch_or_empty(client: &SearchClient, search: &SearchDefinition) -> Vec<RawListing> {
    match client.fetch_listings(search).await {
        Ok(listings) => listings,
        Err(AppError::HttpStatus { status, reason }) => {
            warn!(
                query = search.query,
                remote = search.remote_only,
                "HTTP {} for search: {}",
                status,
                reason
            );
            Vec::new()
        }
        Err(err) => {
            warn!(query = search.query, "Search failed: {}", err);
            Vec::new()
        }
    }
}

/// Runs every search in order and builds the output. Nothing is written.
pub async fn collect(config: &Config, searches: &[SearchDefinition]) -> Result<RunOutput> {
    let client = SearchClient::new(config)?;
    let mut acc = RunAccumulator::new(Utc::now(), config.cutoff);

    for search in searches {
        info!("Fetching: {}", search.label());
        let results = fetch_or_empty(&client, search).await;
        info!("Found {} results", results.len());

        tokio::time::sleep(config.request_delay).await;

        let accepted = acc.absorb(results);
        tracing::debug!(accepted, total = acc.len(), "Normalized search results");
    }

    Ok(acc.finish(Utc::now()))
}

/// One full run over the fixed search list, replacing the output file.
pub async fn run(config: &Config) -> Result<RunOutput> {
    run_searches(config, &SEARCHES).await
}

pub async fn run_searches(config: &Config, searches: &[SearchDefinition]) -> Result<RunOutput> {
    let output = collect(config, searches).await?;
    output.write_to(&config.output_path)?;
    info!(
        "Done! Saved {} jobs to {}",
        output.job_count,
        config.output_path.display()
    );
    Ok(output)
}
