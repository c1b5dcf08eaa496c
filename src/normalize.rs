use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::models::RawListing;

pub const SNIPPET_CHARS: usize = 200;

/// Canonical record written to the output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedListing {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub is_remote: bool,
    pub date_posted: String,
    pub salary: String,
    pub apply_link: String,
    pub description_snippet: String,
    pub employer_logo: String,
}

/// Normalizes one search's results, skipping ids already in `seen` and
/// listings posted before `cutoff`. Accepted ids are added to `seen`.
pub fn normalize_listings(
    raw: Vec<RawListing>,
    seen: &mut HashSet<String>,
    cutoff: DateTime<Utc>,
) -> Vec<NormalizedListing> {
    raw.into_iter()
        .filter_map(|listing| normalize_listing(listing, seen, cutoff))
        .collect()
}

pub fn normalize_listing(
    raw: RawListing,
    seen: &mut HashSet<String>,
    cutoff: DateTime<Utc>,
) -> Option<NormalizedListing> {
    let id = raw.job_id.filter(|id| !id.is_empty())?;
    if seen.contains(&id) {
        return None;
    }

    let date_posted = raw.job_posted_at_datetime_utc.unwrap_or_default();
    if !is_recent(&date_posted, cutoff) {
        return None;
    }

    // Stale listings never reach this point, so a later search may still
    // accept the same id with a newer timestamp.
    seen.insert(id.clone());

    let is_remote = raw.job_is_remote.unwrap_or(false);
    let location = format_location(
        is_remote,
        raw.job_city.as_deref().unwrap_or_default(),
        raw.job_state.as_deref().unwrap_or_default(),
    );
    let salary = format_salary(
        raw.job_min_salary,
        raw.job_max_salary,
        raw.job_salary_period.as_deref(),
    );

    Some(NormalizedListing {
        id,
        title: raw.job_title.unwrap_or_else(|| "Unknown Title".to_string()),
        company: raw.employer_name.unwrap_or_else(|| "Unknown Company".to_string()),
        location,
        is_remote,
        date_posted,
        salary,
        apply_link: raw.job_apply_link.unwrap_or_default(),
        description_snippet: snippet(raw.job_description.as_deref().unwrap_or_default()),
        employer_logo: raw.employer_logo.unwrap_or_default(),
    })
}

/// Empty or unparseable timestamps pass.
fn is_recent(posted: &str, cutoff: DateTime<Utc>) -> bool {
    match parse_posted_at(posted) {
        Some(posted_at) => posted_at >= cutoff,
        None => true,
    }
}

/// Parses an ISO-8601 timestamp. A trailing `Z` is UTC and a timestamp
/// without any offset is taken as UTC too.
pub fn parse_posted_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

pub fn format_location(is_remote: bool, city: &str, state: &str) -> String {
    if is_remote {
        return "Remote".to_string();
    }
    [city.trim(), state.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Zero bounds count as absent.
pub fn format_salary(min: Option<f64>, max: Option<f64>, period: Option<&str>) -> String {
    let min = min.filter(|value| *value != 0.0);
    let max = max.filter(|value| *value != 0.0);

    match (min, max) {
        (Some(min), Some(max)) => {
            let mut salary = format!("${} - ${}", format_currency(min), format_currency(max));
            if let Some(period) = period.filter(|period| !period.is_empty()) {
                salary.push_str(&format!(" ({})", period));
            }
            salary
        }
        (Some(min), None) => format!("From ${}", format_currency(min)),
        (None, Some(max)) => format!("Up to ${}", format_currency(max)),
        (None, None) => String::new(),
    }
}

/// Whole units with `,` thousands separators, e.g. `120,000`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round_ties_even();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn snippet(description: &str) -> String {
    description.chars().take(SNIPPET_CHARS).collect()
}
