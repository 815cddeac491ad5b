//! Crawler module for scanning job-listing sites
//!
//! This module contains the core scanning logic, including:
//! - HTTP fetching with retry logic
//! - Listing page pagination and max-page discovery
//! - The empty-page failure governor and the dedup gate
//! - The per-site scan loop and the scheduler running all sites

mod dedup;
mod fetcher;
mod governor;
mod pagination;
mod scan;
mod scheduler;

pub use dedup::DedupGate;
pub use fetcher::{build_http_client, Document, FetchError, Fetcher};
pub use governor::FailureGovernor;
pub use pagination::{advance, current_url, discover_max_page, should_continue};
pub use scan::ScanLoop;
pub use scheduler::CrawlScheduler;

use crate::config::{Config, RunOptions};
use crate::output::{DeliverySink, DisabledSink, RestApiSink, ScanReport};
use crate::storage::{open_storage, DedupStore};
use crate::Result;
use std::path::Path;
use std::sync::Arc;

/// Runs a complete scan pass over every enabled site
///
/// This is the main entry point for starting a scan. It will:
/// 1. Open the dedup store
/// 2. Build the HTTP client and the delivery sink
/// 3. Run one scan loop per enabled site
/// 4. Return the per-site reports
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `options` - Runtime flags
///
/// # Returns
///
/// * `Ok(Vec<ScanReport>)` - All scans finished
/// * `Err(JobscanError)` - Setup failed before any scan started
pub async fn crawl(config: Config, options: RunOptions) -> Result<Vec<ScanReport>> {
    let store: Arc<dyn DedupStore> =
        Arc::new(open_storage(Path::new(&config.storage.database_path))?);

    let client = build_http_client(&config.fetcher)?;
    let fetcher = Fetcher::new(client.clone(), &config.fetcher);

    let sink: Arc<dyn DeliverySink> = if config.delivery.enabled {
        let sink = RestApiSink::new(client, &config.delivery);
        tracing::info!("Delivering to {}", sink.endpoint());
        Arc::new(sink)
    } else {
        tracing::warn!("Delivery is disabled; nothing will be marked as seen");
        Arc::new(DisabledSink)
    };

    let scheduler = CrawlScheduler::new(&config, options, fetcher, store, sink)?;
    tracing::info!("Scanning sites: {}", scheduler.site_names().join(", "));

    Ok(scheduler.run().await)
}
