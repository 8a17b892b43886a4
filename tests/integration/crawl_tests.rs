//! Integration tests for the sweeper
//!
//! These tests use wiremock to stand in for the autocomplete service and
//! exercise the HTTP lookup, retry policy, strategies and JSON snapshots
//! end-to-end.

use prefix_sweep::config::{ApiConfig, Config, CrawlerConfig, OutputConfig, StrategyKind};
use prefix_sweep::crawler::{run_sweep, Coordinator, CrawlOutcome, HttpLookup};
use prefix_sweep::storage::{read_snapshot, JsonFileSink};
use prefix_sweep::SweepError;
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/v1/autocomplete";

fn create_api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        endpoint: ENDPOINT.to_string(),
        user_agent: "TestSweeper/1.0".to_string(),
    }
}

fn create_crawler_config(strategy: StrategyKind, seeds: &[&str]) -> CrawlerConfig {
    CrawlerConfig {
        strategy,
        rate_limit: 6000, // 10ms between requests
        max_retries: 3,
        retry_delay_ms: 0,
        max_empty_responses: 10,
        batch_size: 5,
        request_timeout_ms: 2000,
        requeue_duplicates: false,
        seeds: seeds.iter().map(|s| s.to_string()).collect(),
    }
}

/// Answers `query` with `results`
async fn mount_completions(server: &MockServer, query: &str, results: &[&str]) {
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .and(query_param("query", query))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": results })))
        .mount(server)
        .await;
}

/// Answers every other query with no completions
async fn mount_empty_fallback(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .with_priority(10)
        .mount(server)
        .await;
}

fn build_coordinator(
    server: &MockServer,
    crawler: CrawlerConfig,
    snapshot: &Path,
) -> Coordinator<HttpLookup, JsonFileSink> {
    let lookup = HttpLookup::from_config(&create_api_config(&server.uri()), &crawler)
        .expect("Failed to build lookup");
    Coordinator::new(crawler, lookup, JsonFileSink::new(snapshot))
}

#[tokio::test]
async fn test_full_sweep_each_strategy() {
    for strategy in [
        StrategyKind::Bfs,
        StrategyKind::Trie,
        StrategyKind::Hybrid,
        StrategyKind::BinarySearch,
    ] {
        let server = MockServer::start().await;
        mount_completions(&server, "a", &["alice", "alina"]).await;
        mount_completions(&server, "b", &["bob"]).await;
        // Follow-ups reached by name expansion (bfs, trie, hybrid)
        mount_completions(&server, "alice", &["alice", "alicia"]).await;
        // Follow-ups reached by split-point expansion
        mount_completions(&server, "al", &["alicia"]).await;
        mount_empty_fallback(&server).await;

        let dir = TempDir::new().unwrap();
        let snapshot = dir.path().join("data").join("names.json");
        let mut coordinator = build_coordinator(
            &server,
            create_crawler_config(strategy, &["a", "b"]),
            &snapshot,
        );

        let report = coordinator.run().await;

        assert_eq!(report.outcome, CrawlOutcome::Drained, "{}", strategy);
        assert_eq!(report.names_discovered, 4, "{}", strategy);

        let mut saved = read_snapshot(&snapshot).expect("Snapshot should exist");
        saved.sort();
        assert_eq!(saved, vec!["alice", "alicia", "alina", "bob"], "{}", strategy);
    }
}

#[tokio::test]
async fn test_server_errors_are_retried_then_skipped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .and(query_param("query", "a"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;
    mount_completions(&server, "b", &["bob"]).await;
    mount_empty_fallback(&server).await;

    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("names.json");
    let mut coordinator = build_coordinator(
        &server,
        create_crawler_config(StrategyKind::Trie, &["a", "b"]),
        &snapshot,
    );

    let report = coordinator.run().await;

    assert_eq!(report.outcome, CrawlOutcome::Drained);
    assert_eq!(report.abandoned_prefixes, 1);
    assert_eq!(report.failed_attempts, 3);
    assert_eq!(read_snapshot(&snapshot).unwrap(), vec!["bob"]);

    server.verify().await;
}

#[tokio::test]
async fn test_malformed_body_counts_as_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut coordinator = build_coordinator(
        &server,
        create_crawler_config(StrategyKind::Bfs, &["a"]),
        &dir.path().join("names.json"),
    );

    let report = coordinator.run().await;

    assert_eq!(report.lookups, 3);
    assert_eq!(report.failed_attempts, 3);
    assert_eq!(report.names_discovered, 0);
}

#[tokio::test]
async fn test_missing_results_field_is_an_empty_answer() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "version": "v1" })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut coordinator = build_coordinator(
        &server,
        create_crawler_config(StrategyKind::Trie, &["a", "b"]),
        &dir.path().join("names.json"),
    );

    let report = coordinator.run().await;

    assert_eq!(report.lookups, 2);
    assert_eq!(report.failed_attempts, 0);
    assert_eq!(report.outcome, CrawlOutcome::Drained);
}

#[tokio::test]
async fn test_slow_responses_time_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "results": ["late"] }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let mut crawler = create_crawler_config(StrategyKind::Trie, &["a"]);
    crawler.request_timeout_ms = 100;
    crawler.max_retries = 2;

    let dir = TempDir::new().unwrap();
    let mut coordinator = build_coordinator(&server, crawler, &dir.path().join("names.json"));

    let report = coordinator.run().await;

    assert_eq!(report.failed_attempts, 2);
    assert_eq!(report.abandoned_prefixes, 1);
    assert_eq!(report.names_discovered, 0);
}

#[tokio::test]
async fn test_exhaustion_stops_before_frontier_drains() {
    let server = MockServer::start().await;
    mount_empty_fallback(&server).await;

    let mut crawler = create_crawler_config(StrategyKind::Bfs, &[]);
    crawler.seeds = prefix_sweep::config::default_seeds();
    crawler.max_empty_responses = 4;

    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("names.json");
    let mut coordinator = build_coordinator(&server, crawler, &snapshot);

    let report = coordinator.run().await;

    assert_eq!(report.outcome, CrawlOutcome::Exhausted);
    assert_eq!(report.prefixes_expanded, 4);
    assert_eq!(report.frontier_remaining, 22);
    // Nothing productive happened, so nothing was written
    assert!(!snapshot.exists());
}

#[tokio::test]
async fn test_unproductive_run_discards_previous_snapshot() {
    let server = MockServer::start().await;
    mount_empty_fallback(&server).await;

    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("names.json");
    std::fs::write(&snapshot, r#"["left", "over"]"#).unwrap();

    let mut crawler = create_crawler_config(StrategyKind::Trie, &[]);
    crawler.seeds = prefix_sweep::config::default_seeds();
    crawler.max_empty_responses = 2;
    let mut coordinator = build_coordinator(&server, crawler, &snapshot);

    let report = coordinator.run().await;

    assert_eq!(report.outcome, CrawlOutcome::Exhausted);
    assert_eq!(report.names_discovered, 0);
    assert!(!snapshot.exists());
}

#[tokio::test]
async fn test_base_url_path_is_kept_in_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/autocomplete"))
        .and(query_param("query", "a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": ["alice"] })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/autocomplete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .with_priority(10)
        .mount(&server)
        .await;

    let crawler = create_crawler_config(StrategyKind::Trie, &["a"]);
    let api = create_api_config(&format!("{}/api/", server.uri()));
    let lookup = HttpLookup::from_config(&api, &crawler).expect("Failed to build lookup");

    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("names.json");
    let mut coordinator = Coordinator::new(crawler, lookup, JsonFileSink::new(&snapshot));

    let report = coordinator.run().await;

    assert_eq!(report.failed_attempts, 0);
    assert_eq!(read_snapshot(&snapshot).unwrap(), vec!["alice"]);
    server.verify().await;
}

#[tokio::test]
async fn test_run_sweep_rejects_invalid_config() {
    let dir = TempDir::new().unwrap();
    let mut crawler = create_crawler_config(StrategyKind::Bfs, &["a"]);
    crawler.batch_size = 0;

    let config = Config {
        crawler,
        api: create_api_config("http://localhost:8000"),
        output: OutputConfig {
            names_path: dir.path().join("names.json").display().to_string(),
        },
    };

    let err = run_sweep(config, CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, SweepError::Config(_)));
}

#[tokio::test]
async fn test_run_sweep_from_config() {
    let server = MockServer::start().await;
    mount_completions(&server, "x", &["xavier", "xena"]).await;
    mount_empty_fallback(&server).await;

    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("out").join("names.json");

    let config = Config {
        crawler: create_crawler_config(StrategyKind::Hybrid, &["x", "y", "z"]),
        api: create_api_config(&server.uri()),
        output: OutputConfig {
            names_path: snapshot.display().to_string(),
        },
    };

    let report = run_sweep(config, CancellationToken::new())
        .await
        .expect("Sweep failed");

    assert_eq!(report.strategy, StrategyKind::Hybrid);
    assert_eq!(report.names_discovered, 2);
    // x, y, z in the first batch; xavier, xena in the second
    assert_eq!(report.lookups, 5);
    assert_eq!(read_snapshot(&snapshot).unwrap(), vec!["xavier", "xena"]);
}

#[tokio::test]
async fn test_interrupted_sweep_saves_progress() {
    let server = MockServer::start().await;
    mount_completions(&server, "a", &["alice"]).await;
    mount_empty_fallback(&server).await;

    let mut crawler = create_crawler_config(StrategyKind::Trie, &["a", "b", "c"]);
    crawler.rate_limit = 1; // a minute between requests

    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("names.json");
    let mut coordinator = build_coordinator(&server, crawler, &snapshot);
    let cancel = coordinator.cancellation_token();

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        cancel.cancel();
    });

    let report = tokio::time::timeout(Duration::from_secs(10), coordinator.run())
        .await
        .expect("Sweep should stop once cancelled");
    canceller.await.unwrap();

    assert_eq!(report.outcome, CrawlOutcome::Interrupted);
    assert_eq!(report.prefixes_expanded, 1);
    // One productive step plus the interrupt snapshot
    assert_eq!(report.snapshots_written, 2);
    assert_eq!(read_snapshot(&snapshot).unwrap(), vec!["alice"]);
}
