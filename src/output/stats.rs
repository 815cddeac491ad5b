//! Scan reports and dedup store statistics
//!
//! This module provides the per-site summary returned by every scan loop
//! and the `--stats` view of the dedup store.

use crate::state::HaltReason;
use crate::storage::DedupStore;
use crate::JobscanError;
use std::fmt;

/// Outcome of one site's scan pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub site: String,

    /// Listing pages fetched successfully
    pub pages_fetched: u32,

    /// Listing pages without any job card
    pub empty_pages: u32,

    /// Job cards found on listing pages
    pub cards_seen: u32,

    /// Cards skipped because their URL was already delivered
    pub duplicates_skipped: u32,

    /// Cards dropped on extraction, detail fetch or validation failure
    pub candidates_dropped: u32,

    pub records_delivered: u32,
    pub batches_delivered: u32,
    pub batches_rejected: u32,

    /// None only for a scan that never ran
    pub halt_reason: Option<HaltReason>,
}

impl ScanReport {
    pub fn new(site: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            ..Default::default()
        }
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} page(s), {} empty, {} card(s), {} duplicate(s), {} dropped, \
             {} record(s) in {} batch(es) delivered, {} batch(es) rejected, halted: {}",
            self.site,
            self.pages_fetched,
            self.empty_pages,
            self.cards_seen,
            self.duplicates_skipped,
            self.candidates_dropped,
            self.records_delivered,
            self.batches_delivered,
            self.batches_rejected,
            self.halt_reason
                .map(|reason| reason.as_str())
                .unwrap_or("not started")
        )
    }
}

/// Prints one line per site report to stdout
pub fn print_reports(reports: &[ScanReport]) {
    println!("=== Scan Reports ===\n");
    for report in reports {
        println!("  {}", report);
    }

    let delivered: u32 = reports.iter().map(|r| r.records_delivered).sum();
    println!();
    println!("Total records delivered: {}", delivered);
}

/// Prints the number of visited URLs per delivery identity
///
/// # Arguments
///
/// * `storage` - The dedup store to query
///
/// # Returns
///
/// * `Ok(())` - Statistics printed
/// * `Err(JobscanError)` - Failed to query the store
pub fn print_statistics(storage: &dyn DedupStore) -> Result<(), JobscanError> {
    let counts = storage.count_by_identity()?;

    println!("=== Dedup Store Statistics ===\n");
    if counts.is_empty() {
        println!("  No visited URLs recorded");
        return Ok(());
    }

    for (identity, count) in &counts {
        println!("  {}: {} URL(s)", identity, count);
    }
    println!();
    println!("Total: {}", counts.iter().map(|(_, c)| c).sum::<u64>());

    Ok(())
}
