//! Scan loop scenarios against a mock job site

use crate::support::*;
use jobscan::config::RunOptions;
use jobscan::state::HaltReason;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_seven_page_scan_halts_after_five_empty_pages() {
    let server = MockServer::start().await;
    let name = "finn";

    mount_listing(&server, name, 1, listing_html(&[1, 2])).await;
    mount_listing(&server, name, 2, empty_listing_html()).await;
    mount_listing(&server, name, 3, listing_html(&[3, 4, 5])).await;
    for page in 4..=7 {
        mount_listing(&server, name, page, empty_listing_html()).await;
    }
    Mock::given(method("GET"))
        .and(path(listing_path(name, 8)))
        .respond_with(ResponseTemplate::new(200).set_body_string(empty_listing_html()))
        .expect(0)
        .mount(&server)
        .await;
    mount_details(&server, &[1, 2, 3, 4, 5]).await;

    let sink = RecordingSink::new(SinkMode::Accept);
    let report = run_scan(
        site(&server, name),
        memory_store(),
        sink.clone(),
        5,
        RunOptions::default(),
    )
    .await;

    assert_eq!(sink.batch_sizes(), vec![2, 3]);
    assert_eq!(report.pages_fetched, 7);
    assert_eq!(report.empty_pages, 5);
    assert_eq!(report.cards_seen, 5);
    assert_eq!(report.records_delivered, 5);
    assert_eq!(report.batches_delivered, 2);
    assert_eq!(report.halt_reason, Some(HaltReason::FailureThreshold));
}

#[tokio::test]
async fn test_delivered_records_are_complete() {
    let server = MockServer::start().await;
    let name = "finn";

    mount_listing(&server, name, 1, listing_html(&[7])).await;
    mount_listing(&server, name, 2, empty_listing_html()).await;
    mount_details(&server, &[7]).await;

    let sink = RecordingSink::new(SinkMode::Accept);
    run_scan(
        site(&server, name),
        memory_store(),
        sink.clone(),
        1,
        RunOptions::default(),
    )
    .await;

    let batches = sink.batches();
    let record = &batches[0][0];
    assert_eq!(record.url, format!("{}/ad/7", server.uri()));
    assert_eq!(record.title, "Job 7");
    assert_eq!(record.company_name, "Company 7");
    assert_eq!(record.description, "<p>Description 7</p>");
    assert!(record.deadline_valid);
    assert_eq!(record.tags.len(), 2);
    assert_eq!(
        record.attributes["Sector"].iter().next().map(String::as_str),
        Some("Not specified")
    );
}

#[tokio::test]
async fn test_second_pass_delivers_nothing() {
    let server = MockServer::start().await;
    let name = "finn";

    mount_listing(&server, name, 1, listing_html(&[1, 2])).await;
    mount_listing(&server, name, 2, empty_listing_html()).await;
    mount_details(&server, &[1, 2]).await;

    let store = memory_store();

    let first_sink = RecordingSink::new(SinkMode::Accept);
    let first = run_scan(
        site(&server, name),
        store.clone(),
        first_sink.clone(),
        1,
        RunOptions::default(),
    )
    .await;
    assert_eq!(first.records_delivered, 2);

    let second_sink = RecordingSink::new(SinkMode::Accept);
    let second = run_scan(
        site(&server, name),
        store.clone(),
        second_sink.clone(),
        1,
        RunOptions::default(),
    )
    .await;

    assert!(second_sink.batches().is_empty());
    assert_eq!(second.duplicates_skipped, 2);
    assert_eq!(second.records_delivered, 0);
    assert!(store.exists(&format!("{}/ad/1", server.uri()), IDENTITY).unwrap());
}

#[tokio::test]
async fn test_rejected_batch_is_not_marked_seen() {
    let server = MockServer::start().await;
    let name = "finn";

    mount_listing(&server, name, 1, listing_html(&[1, 2])).await;
    mount_listing(&server, name, 2, empty_listing_html()).await;
    mount_details(&server, &[1, 2]).await;

    let store = memory_store();
    let sink = RecordingSink::new(SinkMode::Reject);
    let report = run_scan(
        site(&server, name),
        store.clone(),
        sink.clone(),
        1,
        RunOptions::default(),
    )
    .await;

    assert_eq!(sink.batch_sizes(), vec![2]);
    assert_eq!(report.batches_rejected, 1);
    assert_eq!(report.records_delivered, 0);
    assert_eq!(report.halt_reason, Some(HaltReason::FailureThreshold));
    assert!(!store.exists(&format!("{}/ad/1", server.uri()), IDENTITY).unwrap());
}

#[tokio::test]
async fn test_delivery_fault_halts_scan() {
    let server = MockServer::start().await;
    let name = "finn";

    mount_listing(&server, name, 1, listing_html(&[1])).await;
    Mock::given(method("GET"))
        .and(path(listing_path(name, 2)))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&[2])))
        .expect(0)
        .mount(&server)
        .await;
    mount_details(&server, &[1, 2]).await;

    let store = memory_store();
    let sink = RecordingSink::new(SinkMode::Fail);
    let report = run_scan(
        site(&server, name),
        store.clone(),
        sink.clone(),
        5,
        RunOptions::default(),
    )
    .await;

    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.halt_reason, Some(HaltReason::DeliveryFailed));
    assert!(!store.exists(&format!("{}/ad/1", server.uri()), IDENTITY).unwrap());
}

#[tokio::test]
async fn test_listing_fetch_failure_halts_after_retries() {
    let server = MockServer::start().await;
    let name = "finn";

    Mock::given(method("GET"))
        .and(path(listing_path(name, 1)))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let sink = RecordingSink::new(SinkMode::Accept);
    let report = run_scan(
        site(&server, name),
        memory_store(),
        sink.clone(),
        5,
        RunOptions::default(),
    )
    .await;

    assert_eq!(report.pages_fetched, 0);
    assert_eq!(report.halt_reason, Some(HaltReason::ListingFetchFailed));
    assert!(sink.batches().is_empty());
}

#[tokio::test]
async fn test_broken_candidates_are_dropped_individually() {
    let server = MockServer::start().await;
    let name = "finn";

    // The last card has no link, ad 2 has no company and ad 4 is missing
    let listing = format!(
        "{}{}",
        listing_html(&[1, 2, 4]),
        r#"<article class="job"><h2>No link</h2></article>"#
    );
    mount_listing(&server, name, 1, listing).await;
    mount_listing(&server, name, 2, empty_listing_html()).await;
    mount_details(&server, &[1]).await;
    Mock::given(method("GET"))
        .and(path("/ad/2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<section class="body"><p>No company here</p></section>"#,
        ))
        .mount(&server)
        .await;

    let sink = RecordingSink::new(SinkMode::Accept);
    let report = run_scan(
        site(&server, name),
        memory_store(),
        sink.clone(),
        1,
        RunOptions::default(),
    )
    .await;

    assert_eq!(sink.batch_sizes(), vec![1]);
    assert_eq!(report.cards_seen, 4);
    assert_eq!(report.candidates_dropped, 3);
    assert_eq!(report.records_delivered, 1);
}

#[tokio::test]
async fn test_bounded_discovery_failure_stops_before_scanning() {
    let server = MockServer::start().await;
    let name = "karrierestart";

    Mock::given(method("GET"))
        .and(path(listing_path(name, 1)))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&[1])))
        .expect(1)
        .mount(&server)
        .await;
    mount_details(&server, &[1]).await;

    let sink = RecordingSink::new(SinkMode::Accept);
    let report = run_scan(
        bounded_site(&server, name),
        memory_store(),
        sink.clone(),
        5,
        RunOptions::default(),
    )
    .await;

    assert_eq!(report.halt_reason, Some(HaltReason::MaxPageUnknown));
    assert_eq!(report.pages_fetched, 0);
    assert!(sink.batches().is_empty());
}

#[tokio::test]
async fn test_bounded_scan_stops_at_last_page() {
    let server = MockServer::start().await;
    let name = "karrierestart";

    let first = format!(
        "{}{}",
        listing_html(&[1]),
        r#"<ul class="paginate"><li><a href="?page=1">1</a></li><li><a href="?page=2">2</a></li></ul>"#
    );
    mount_listing(&server, name, 1, first).await;
    mount_listing(&server, name, 2, listing_html(&[2])).await;
    Mock::given(method("GET"))
        .and(path(listing_path(name, 3)))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&[3])))
        .expect(0)
        .mount(&server)
        .await;
    mount_details(&server, &[1, 2, 3]).await;

    let sink = RecordingSink::new(SinkMode::Accept);
    let report = run_scan(
        bounded_site(&server, name),
        memory_store(),
        sink.clone(),
        5,
        RunOptions::default(),
    )
    .await;

    assert_eq!(sink.batch_sizes(), vec![1, 1]);
    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.halt_reason, Some(HaltReason::PagesExhausted));
}

#[tokio::test]
async fn test_start_page_override() {
    let server = MockServer::start().await;
    let name = "finn";

    Mock::given(method("GET"))
        .and(path(listing_path(name, 1)))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&[1])))
        .expect(0)
        .mount(&server)
        .await;
    mount_listing(&server, name, 3, listing_html(&[3])).await;
    mount_listing(&server, name, 4, empty_listing_html()).await;
    mount_details(&server, &[1, 3]).await;

    let options = RunOptions {
        start_page: Some(3),
        ..RunOptions::default()
    };
    let sink = RecordingSink::new(SinkMode::Accept);
    let report = run_scan(site(&server, name), memory_store(), sink.clone(), 1, options).await;

    let batches = sink.batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0][0].title, "Job 3");
    assert_eq!(report.pages_fetched, 2);
}
