//! End-to-end scans from a TOML configuration to the REST API

use crate::support::*;
use jobscan::config::{load_config, RunOptions};
use jobscan::crawler::crawl;
use jobscan::state::HaltReason;
use jobscan::storage::{DedupStore, SqliteStorage};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_config(server: &MockServer, database: &str, enabled: bool) -> NamedTempFile {
    let content = format!(
        r#"
[fetcher]
timeout-secs = 5
retry-delay-ms = 10

[scan]
failure-threshold = 1

[delivery]
ip = "127.0.0.1"
port = {port}
path = "api/jobs"
request-param = "jobs"
enabled = {enabled}

[storage]
database-path = "{database}"

[[site]]
name = "finn"
base-url = "{uri}/finn/jobs"
paged-url = "{uri}/finn/jobs/page/{{page}}"

[site.rules]
card = "article.job"
url = {{ selector = "a.link", mode = "attr", attr = "href", absolute = true }}
title = {{ selector = "h2" }}
company = {{ selector = ".company" }}
description = {{ selector = "section.body", mode = "html" }}
deadline = {{ selector = ".deadline" }}
tags = {{ selector = "ul.tags li" }}
"#,
        port = server.address().port(),
        uri = server.uri(),
        database = database,
        enabled = enabled,
    );

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

async fn mount_site(server: &MockServer) {
    mount_listing(server, "finn", 1, listing_html(&[1, 2])).await;
    mount_listing(server, "finn", 2, empty_listing_html()).await;
    mount_details(server, &[1, 2]).await;
}

#[tokio::test]
async fn test_crawl_delivers_once_across_runs() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/jobs"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let database = dir.path().join("visited.db");
    let file = write_config(&server, &database.display().to_string(), true);

    let config = load_config(file.path()).unwrap();
    let reports = crawl(config.clone(), RunOptions::default()).await.unwrap();
    assert_eq!(reports[0].records_delivered, 2);
    assert_eq!(reports[0].halt_reason, Some(HaltReason::FailureThreshold));

    let reports = crawl(config, RunOptions::default()).await.unwrap();
    assert_eq!(reports[0].records_delivered, 0);
    assert_eq!(reports[0].duplicates_skipped, 2);

    let storage = SqliteStorage::new(&database).unwrap();
    let identity = format!("127.0.0.1:{}", server.address().port());
    assert_eq!(storage.count_by_identity().unwrap(), vec![(identity, 2)]);
}

#[tokio::test]
async fn test_crawl_with_delivery_disabled_marks_nothing() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let database = dir.path().join("visited.db");
    let file = write_config(&server, &database.display().to_string(), false);

    let config = load_config(file.path()).unwrap();
    let reports = crawl(config, RunOptions::default()).await.unwrap();
    assert_eq!(reports[0].batches_rejected, 1);
    assert_eq!(reports[0].records_delivered, 0);

    let storage = SqliteStorage::new(&database).unwrap();
    assert!(storage.count_by_identity().unwrap().is_empty());
}

#[tokio::test]
async fn test_rejected_delivery_is_retried_next_run() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/jobs"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(2)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let database = dir.path().join("visited.db");
    let file = write_config(&server, &database.display().to_string(), true);
    let config = load_config(file.path()).unwrap();

    for _ in 0..2 {
        let reports = crawl(config.clone(), RunOptions::default()).await.unwrap();
        assert_eq!(reports[0].batches_rejected, 1);
        assert_eq!(reports[0].duplicates_skipped, 0);
    }
}
