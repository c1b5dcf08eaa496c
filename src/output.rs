use std::fs;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::normalize::NormalizedListing;

/// Document persisted at the end of every run.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunOutput {
    pub last_updated: String,
    pub job_count: usize,
    pub jobs: Vec<NormalizedListing>,
}

impl RunOutput {
    /// Sorts newest first by the raw `date_posted` text. The sort is stable
    /// and purely lexical, so undated listings end up last.
    pub fn new(mut jobs: Vec<NormalizedListing>, finished_at: DateTime<Utc>) -> Self {
        jobs.sort_by(|a, b| b.date_posted.cmp(&a.date_posted));
        RunOutput {
            last_updated: finished_at.to_rfc3339_opts(SecondsFormat::Micros, false),
            job_count: jobs.len(),
            jobs,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replaces whatever is at `path`.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
