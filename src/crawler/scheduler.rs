//! Scheduler running one scan loop per enabled site
//!
//! This module handles:
//! - Skipping sites named in the disable list
//! - Building each site's extractor and scan loop
//! - Running all scan loops concurrently, one tokio task per site
//! - Collecting their reports, including those of failed tasks

use crate::config::{Config, RunOptions, SiteDescriptor};
use crate::crawler::dedup::DedupGate;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::governor::FailureGovernor;
use crate::crawler::scan::ScanLoop;
use crate::extract::{Extractor, SelectorExtractor};
use crate::output::{DeliverySink, ScanReport};
use crate::storage::DedupStore;
use crate::JobscanError;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Runs the scan loops of every enabled site
pub struct CrawlScheduler {
    sites: Vec<(Arc<SiteDescriptor>, Arc<dyn Extractor>)>,
    fetcher: Fetcher,
    store: Arc<dyn DedupStore>,
    sink: Arc<dyn DeliverySink>,
    identity: String,
    governor: FailureGovernor,
    options: Arc<RunOptions>,
}

impl CrawlScheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    /// * `options` - Runtime flags
    /// * `fetcher` - Shared HTTP fetcher
    /// * `store` - Dedup store shared by all sites
    /// * `sink` - Delivery sink shared by all sites
    ///
    /// Fails if a site's extraction rules do not compile.
    pub fn new(
        config: &Config,
        options: RunOptions,
        fetcher: Fetcher,
        store: Arc<dyn DedupStore>,
        sink: Arc<dyn DeliverySink>,
    ) -> Result<Self, JobscanError> {
        let mut sites = Vec::new();
        for site in &config.sites {
            if options.is_disabled(&site.name) {
                tracing::info!("Site '{}' is disabled, skipping", site.name);
                continue;
            }
            let extractor: Arc<dyn Extractor> = Arc::new(SelectorExtractor::new(&site.rules)?);
            sites.push((Arc::new(site.clone()), extractor));
        }

        Ok(Self {
            sites,
            fetcher,
            store,
            sink,
            identity: config.delivery.identity(),
            governor: FailureGovernor::new(config.scan.failure_threshold),
            options: Arc::new(options),
        })
    }

    /// Names of the sites that will be scanned
    pub fn site_names(&self) -> Vec<&str> {
        self.sites.iter().map(|(site, _)| site.name.as_str()).collect()
    }

    fn scan_loop(&self, site: Arc<SiteDescriptor>, extractor: Arc<dyn Extractor>) -> ScanLoop {
        ScanLoop::new(
            site,
            extractor,
            self.fetcher.clone(),
            DedupGate::new(Arc::clone(&self.store), self.identity.clone()),
            Arc::clone(&self.sink),
            self.governor,
            Arc::clone(&self.options),
        )
    }

    /// Runs every site's scan and waits for all of them
    ///
    /// Reports are returned in configuration order. A task that panics is
    /// logged and reported without a halt reason.
    pub async fn run(self) -> Vec<ScanReport> {
        let mut tasks = JoinSet::new();

        for (index, (site, extractor)) in self.sites.iter().enumerate() {
            let scan = self.scan_loop(Arc::clone(site), Arc::clone(extractor));
            tasks.spawn(async move { (index, scan.run().await) });
        }

        let mut reports: Vec<Option<ScanReport>> = vec![None; self.sites.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, report)) => reports[index] = Some(report),
                Err(e) => tracing::error!("Scan task failed: {}", e),
            }
        }

        reports
            .into_iter()
            .zip(&self.sites)
            .map(|(report, (site, _))| {
                report.unwrap_or_else(|| ScanReport::new(site.name.clone()))
            })
            .collect()
    }
}
