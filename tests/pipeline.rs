use std::collections::HashSet;
use std::process::Command;
use std::time::Duration;

use chrono::Utc;
use job_feed::normalize::parse_posted_at;
use job_feed::pipeline::run_searches;
use job_feed::searches::SearchDefinition;
use job_feed::{Config, RunOutput};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

const LOCAL: SearchDefinition = SearchDefinition {
    query: "brand strategy healthcare",
    location: "New York, NY",
    remote_only: false,
};
const REMOTE: SearchDefinition = SearchDefinition {
    query: "brand strategy healthcare",
    location: "United States",
    remote_only: true,
};
const FAILING: SearchDefinition = SearchDefinition {
    query: "brand director femtech",
    location: "New York, NY",
    remote_only: false,
};

fn hours_ago(hours: i64) -> String {
    (Utc::now() - chrono::Duration::hours(hours))
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

fn test_config(server: &ServerGuard, dir: &tempfile::TempDir) -> Config {
    let mut config = Config::with_api_key(Some("test-key".to_string())).unwrap();
    config.base_url = format!("{}/search", server.url());
    config.request_delay = Duration::ZERO;
    config.output_path = dir.path().join("jobs.json");
    config
}

async fn mock_search(
    server: &mut ServerGuard,
    search: &SearchDefinition,
    status: usize,
    body: serde_json::Value,
) -> mockito::Mock {
    server
        .mock("GET", "/search")
        .match_header("x-rapidapi-key", "test-key")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), search.query.into()),
            Matcher::UrlEncoded("remote_jobs_only".into(), search.remote_only.to_string()),
        ]))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(1)
        .create_async()
        .await
}

#[tokio::test]
async fn run_dedups_filters_and_survives_failed_searches() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, &dir);

    let local = mock_search(
        &mut server,
        &LOCAL,
        200,
        json!({"data": [
            {"job_id": "J1", "job_title": "Brand Strategist", "employer_name": "Acme",
             "job_city": "New York", "job_state": "NY", "job_posted_at_datetime_utc": hours_ago(10),
             "job_min_salary": 80000, "job_max_salary": 120000, "job_salary_period": "year"},
            {"job_id": "STALE", "job_posted_at_datetime_utc": hours_ago(50)},
        ]}),
    )
    .await;
    let remote = mock_search(
        &mut server,
        &REMOTE,
        200,
        json!({"data": [
            {"job_id": "J1", "job_title": "Duplicate", "job_posted_at_datetime_utc": hours_ago(10)},
            {"job_id": "J2", "job_is_remote": true, "job_posted_at_datetime_utc": hours_ago(2)},
            {"job_id": "J3"},
        ]}),
    )
    .await;
    let failing = mock_search(&mut server, &FAILING, 503, json!({"message": "down"})).await;

    let output = run_searches(&config, &[LOCAL, REMOTE, FAILING]).await.unwrap();

    local.assert_async().await;
    remote.assert_async().await;
    failing.assert_async().await;

    let ids: Vec<_> = output.jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, ["J2", "J1", "J3"]);
    assert_eq!(output.job_count, output.jobs.len());

    let j1 = &output.jobs[1];
    assert_eq!(j1.title, "Brand Strategist");
    assert_eq!(j1.location, "New York, NY");
    assert_eq!(j1.salary, "$80,000 - $120,000 (year)");

    let j3 = &output.jobs[2];
    assert_eq!(j3.title, "Unknown Title");
    assert_eq!(j3.company, "Unknown Company");

    assert_eq!(output.jobs[0].location, "Remote");
}

#[tokio::test]
async fn written_file_matches_returned_output() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, &dir);
    std::fs::write(&config.output_path, "stale contents").unwrap();

    let _local = mock_search(
        &mut server,
        &LOCAL,
        200,
        json!({"data": [
            {"job_id": "A", "job_posted_at_datetime_utc": hours_ago(30)},
            {"job_id": "B", "job_posted_at_datetime_utc": hours_ago(1)},
            {"job_id": "C", "job_posted_at_datetime_utc": hours_ago(47)},
        ]}),
    )
    .await;

    let started = Utc::now();
    let output = run_searches(&config, &[LOCAL]).await.unwrap();

    let contents = std::fs::read_to_string(&config.output_path).unwrap();
    assert!(contents.starts_with("{\n  \"last_updated\""));
    let written: RunOutput = serde_json::from_str(&contents).unwrap();

    assert_eq!(written.job_count, 3);
    assert_eq!(written.job_count, written.jobs.len());
    assert_eq!(written.last_updated, output.last_updated);

    let ids: HashSet<_> = written.jobs.iter().map(|j| j.id.clone()).collect();
    assert_eq!(ids.len(), written.jobs.len());

    let cutoff = started - chrono::Duration::hours(48);
    for job in &written.jobs {
        if let Some(posted) = parse_posted_at(&job.date_posted) {
            assert!(posted >= cutoff);
        }
    }
    assert!(written
        .jobs
        .windows(2)
        .all(|pair| pair[0].date_posted >= pair[1].date_posted));
}

#[tokio::test]
async fn unreachable_api_still_writes_empty_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::with_api_key(Some("test-key".to_string())).unwrap();
    config.base_url = "http://127.0.0.1:1/search".to_string();
    config.request_delay = Duration::ZERO;
    config.output_path = dir.path().join("jobs.json");

    let output = run_searches(&config, &[LOCAL, REMOTE]).await.unwrap();

    assert_eq!(output.job_count, 0);
    assert!(config.output_path.exists());
}

#[tokio::test]
async fn invalid_json_body_still_writes_empty_output() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server, &dir);

    let garbled = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("not json")
        .expect(1)
        .create_async()
        .await;

    let output = run_searches(&config, &[LOCAL]).await.unwrap();
    garbled.assert_async().await;

    assert_eq!(output.job_count, 0);
    let written: RunOutput =
        serde_json::from_str(&std::fs::read_to_string(&config.output_path).unwrap()).unwrap();
    assert_eq!(written.job_count, 0);
    assert!(written.jobs.is_empty());
}

#[test]
fn missing_credential_exits_non_zero_without_output() {
    let dir = tempfile::tempdir().unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_job-feed"))
        .current_dir(dir.path())
        .env_remove("RAPIDAPI_KEY")
        .status()
        .unwrap();

    assert!(!status.success());
    assert!(!dir.path().join("jobs.json").exists());
}
