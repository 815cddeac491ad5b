//! Per-site scan loop
//!
//! One `ScanLoop` walks one site's listing pages in order. For every page it
//! extracts the job cards, skips postings that were already delivered,
//! fetches and extracts the remaining detail pages, and hands the valid
//! records to the delivery sink as a single batch. Everything inside a loop
//! is sequential; concurrency only exists between sites.

use crate::config::{PaginationStyle, RunOptions, SiteDescriptor};
use crate::crawler::dedup::DedupGate;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::governor::FailureGovernor;
use crate::crawler::pagination::{advance, current_url, discover_max_page, should_continue};
use crate::extract::{build_record, Extractor, ListingSummary};
use crate::output::{DeliverySink, ScanReport};
use crate::record::CandidateRecord;
use crate::state::{HaltReason, ScanCursor, ScanState};
use crate::JobscanError;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Scan loop of a single site
pub struct ScanLoop {
    site: Arc<SiteDescriptor>,
    extractor: Arc<dyn Extractor>,
    fetcher: Fetcher,
    gate: DedupGate,
    sink: Arc<dyn DeliverySink>,
    governor: FailureGovernor,
    options: Arc<RunOptions>,
    state: ScanState,
    cursor: ScanCursor,
    report: ScanReport,
}

impl ScanLoop {
    /// Creates an idle scan loop
    ///
    /// The cursor starts at the start-page override if one is set, otherwise
    /// at the site's initial page.
    pub fn new(
        site: Arc<SiteDescriptor>,
        extractor: Arc<dyn Extractor>,
        fetcher: Fetcher,
        gate: DedupGate,
        sink: Arc<dyn DeliverySink>,
        governor: FailureGovernor,
        options: Arc<RunOptions>,
    ) -> Self {
        let start_page = options.start_page.unwrap_or(site.initial_page);
        let report = ScanReport::new(site.name.clone());

        Self {
            site,
            extractor,
            fetcher,
            gate,
            sink,
            governor,
            options,
            state: ScanState::Idle,
            cursor: ScanCursor::new(start_page),
            report,
        }
    }

    /// Runs the scan to completion and returns its report
    pub async fn run(mut self) -> ScanReport {
        info!(
            "[{}] Starting scan at page {} (delivery identity {})",
            self.site.name,
            self.cursor.page,
            self.gate.identity()
        );

        if self.site.pagination == PaginationStyle::Bounded {
            match discover_max_page(&self.fetcher, self.extractor.as_ref(), &self.site).await {
                Ok(max_page) => {
                    info!("[{}] Last listing page is {}", self.site.name, max_page);
                    self.cursor.max_page = max_page;
                }
                Err(e) => {
                    error!("[{}] Could not determine last page: {}", self.site.name, e);
                    self.cursor.halt(HaltReason::MaxPageUnknown);
                    return self.finish();
                }
            }
        }

        if let Err(e) = self.transition(ScanState::Running) {
            error!("[{}] {}", self.site.name, e);
            return self.finish();
        }

        while should_continue(&self.cursor) {
            self.scan_page().await;
            advance(&mut self.cursor);
        }

        self.cursor.halt(HaltReason::PagesExhausted);
        self.finish()
    }

    fn transition(&mut self, next: ScanState) -> Result<(), JobscanError> {
        if !self.state.can_transition_to(next) {
            return Err(JobscanError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        debug!("[{}] {} -> {}", self.site.name, self.state, next);
        self.state = next;
        Ok(())
    }

    fn finish(mut self) -> ScanReport {
        if let Err(e) = self.transition(ScanState::Halted) {
            error!("[{}] {}", self.site.name, e);
        }
        self.report.halt_reason = self.cursor.halt_reason();

        info!(
            "[{}] Scan halted ({}): {} record(s) delivered from {} page(s)",
            self.site.name,
            self.report
                .halt_reason
                .map(|reason| reason.as_str())
                .unwrap_or("unknown"),
            self.report.records_delivered,
            self.report.pages_fetched
        );
        self.report
    }

    async fn scan_page(&mut self) {
        let url = match current_url(&self.site, &self.cursor) {
            Ok(url) => url,
            Err(e) => {
                error!(
                    "[{}] Cannot build URL for page {}: {}",
                    self.site.name, self.cursor.page, e
                );
                self.governor.listing_fetch_failed(&mut self.cursor);
                return;
            }
        };

        debug!("[{}] Fetching listing page {}: {}", self.site.name, self.cursor.page, url);
        let document = match self.fetcher.fetch(&url).await {
            Ok(document) => document,
            Err(e) => {
                error!("[{}] Listing page unavailable, stopping: {}", self.site.name, e);
                self.governor.listing_fetch_failed(&mut self.cursor);
                return;
            }
        };
        self.report.pages_fetched += 1;

        let cards = self.extractor.listing(&document);
        if cards.is_empty() {
            self.report.empty_pages += 1;
            self.governor.record_empty_page(&self.site.name, &mut self.cursor);
            return;
        }
        self.report.cards_seen += cards.len() as u32;

        let mut batch = Vec::new();
        let mut batch_urls = HashSet::new();
        for card in cards {
            let summary = match card {
                Ok(summary) => summary,
                Err(e) => {
                    warn!("[{}] Skipping job card: {}", self.site.name, e);
                    self.report.candidates_dropped += 1;
                    continue;
                }
            };

            let url = summary.url.as_str();
            if batch_urls.contains(url) || self.gate.is_seen(url) {
                debug!("[{}] Already delivered: {}", self.site.name, summary.url);
                self.report.duplicates_skipped += 1;
                continue;
            }

            match self.candidate(summary).await {
                Some(record) => {
                    batch_urls.insert(record.url.clone());
                    batch.push(record);
                }
                None => self.report.candidates_dropped += 1,
            }
        }

        self.deliver(batch).await;
    }

    /// Fetches and extracts one posting's detail page
    ///
    /// Returns None when the page cannot be fetched or extracted, or when
    /// the resulting record is not valid.
    async fn candidate(&self, summary: ListingSummary) -> Option<CandidateRecord> {
        let document = match self.fetcher.fetch(&summary.url).await {
            Ok(document) => document,
            Err(e) => {
                warn!("[{}] Dropping {}: {}", self.site.name, summary.url, e);
                return None;
            }
        };

        let detail = match self.extractor.detail(&document) {
            Ok(detail) => detail,
            Err(e) => {
                warn!("[{}] Dropping {}: {}", self.site.name, summary.url, e);
                return None;
            }
        };

        let record = build_record(summary, detail);
        if !record.is_valid() {
            debug!("[{}] Incomplete posting dropped: {}", self.site.name, record.url);
            return None;
        }

        if self.options.debug {
            info!("[{}] {}", self.site.name, record);
        }
        Some(record)
    }

    async fn deliver(&mut self, batch: Vec<CandidateRecord>) {
        if batch.is_empty() {
            debug!("[{}] Nothing new on page {}", self.site.name, self.cursor.page);
            return;
        }

        match self.sink.deliver(&batch).await {
            Ok(true) => {
                self.gate.mark_seen(&batch);
                self.report.records_delivered += batch.len() as u32;
                self.report.batches_delivered += 1;
            }
            Ok(false) => {
                warn!(
                    "[{}] Batch of {} record(s) from page {} was not delivered",
                    self.site.name,
                    batch.len(),
                    self.cursor.page
                );
                self.report.batches_rejected += 1;
            }
            Err(e) => {
                error!("[{}] Delivery failed, stopping: {}", self.site.name, e);
                self.governor.delivery_failed(&mut self.cursor);
            }
        }
    }
}
