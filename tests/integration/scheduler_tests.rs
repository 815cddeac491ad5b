//! Scheduler scenarios: several sites, disable list, page encodings

use crate::support::*;
use jobscan::config::{
    Config, DeliveryConfig, PageEncoding, RunOptions, ScanConfig, SiteDescriptor, StorageConfig,
};
use jobscan::crawler::CrawlScheduler;
use jobscan::state::HaltReason;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(sites: Vec<SiteDescriptor>) -> Config {
    Config {
        fetcher: fetcher_config(),
        scan: ScanConfig {
            failure_threshold: 1,
        },
        delivery: DeliveryConfig {
            ip: "127.0.0.1".to_string(),
            port: Some(9000),
            path: "api/jobs".to_string(),
            request_param: "jobs".to_string(),
            enabled: true,
        },
        storage: StorageConfig {
            database_path: ":memory:".to_string(),
        },
        sites,
    }
}

#[tokio::test]
async fn test_sites_run_concurrently_and_report_in_order() {
    let server = MockServer::start().await;

    mount_listing(&server, "finn", 1, listing_html(&[1])).await;
    mount_listing(&server, "finn", 2, empty_listing_html()).await;
    mount_listing(&server, "karriere", 1, listing_html(&[2, 3])).await;
    mount_listing(&server, "karriere", 2, empty_listing_html()).await;
    mount_details(&server, &[1, 2, 3]).await;

    let config = config(vec![site(&server, "finn"), site(&server, "karriere")]);
    let sink = RecordingSink::new(SinkMode::Accept);
    let scheduler = CrawlScheduler::new(
        &config,
        RunOptions::default(),
        fetcher(),
        memory_store(),
        sink.clone(),
    )
    .unwrap();

    let reports = scheduler.run().await;

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].site, "finn");
    assert_eq!(reports[0].records_delivered, 1);
    assert_eq!(reports[1].site, "karriere");
    assert_eq!(reports[1].records_delivered, 2);

    let mut sizes = sink.batch_sizes();
    sizes.sort();
    assert_eq!(sizes, vec![1, 2]);
}

#[tokio::test]
async fn test_disabled_site_is_never_fetched() {
    let server = MockServer::start().await;

    mount_listing(&server, "finn", 1, listing_html(&[1])).await;
    mount_listing(&server, "finn", 2, empty_listing_html()).await;
    mount_details(&server, &[1]).await;
    Mock::given(method("GET"))
        .and(path(listing_path("karriere", 1)))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&[2])))
        .expect(0)
        .mount(&server)
        .await;

    let config = config(vec![site(&server, "finn"), site(&server, "karriere")]);
    let options = RunOptions {
        disabled_sites: RunOptions::parse_disabled_sites("Karriere/"),
        ..RunOptions::default()
    };
    let scheduler = CrawlScheduler::new(
        &config,
        options,
        fetcher(),
        memory_store(),
        RecordingSink::new(SinkMode::Accept),
    )
    .unwrap();

    assert_eq!(scheduler.site_names(), vec!["finn"]);
    let reports = scheduler.run().await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].site, "finn");
}

#[tokio::test]
async fn test_offset_page_encoding() {
    let server = MockServer::start().await;

    let mut arbeidsplassen = site(&server, "arbeidsplassen");
    arbeidsplassen.paged_url = format!("{}/arbeidsplassen/search?from={{page}}", server.uri());
    arbeidsplassen.page_encoding = PageEncoding::Offset { page_size: 25 };

    mount_listing(&server, "arbeidsplassen", 1, listing_html(&[1])).await;
    Mock::given(method("GET"))
        .and(path("/arbeidsplassen/search"))
        .and(query_param("from", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&[2])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/arbeidsplassen/search"))
        .and(query_param("from", "75"))
        .respond_with(ResponseTemplate::new(200).set_body_string(empty_listing_html()))
        .expect(1)
        .mount(&server)
        .await;
    mount_details(&server, &[1, 2]).await;

    let config = config(vec![arbeidsplassen]);
    let sink = RecordingSink::new(SinkMode::Accept);
    let reports = CrawlScheduler::new(
        &config,
        RunOptions {
            start_page: Some(2),
            ..RunOptions::default()
        },
        fetcher(),
        memory_store(),
        sink.clone(),
    )
    .unwrap()
    .run()
    .await;

    assert_eq!(reports[0].pages_fetched, 2);
    assert_eq!(reports[0].halt_reason, Some(HaltReason::FailureThreshold));
    assert_eq!(sink.batches()[0][0].title, "Job 2");
}

#[tokio::test]
async fn test_uncompilable_rules_fail_before_scanning() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&[1])))
        .expect(0)
        .mount(&server)
        .await;

    let mut broken = site(&server, "finn");
    broken.rules.card = "article[[".to_string();
    let config = config(vec![broken]);

    let result = CrawlScheduler::new(
        &config,
        RunOptions::default(),
        fetcher(),
        memory_store(),
        RecordingSink::new(SinkMode::Accept),
    );
    assert!(result.is_err());
}
