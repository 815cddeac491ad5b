//! Failure governor
//!
//! Decides when a site's scan must stop because of repeated empty listing
//! pages or a fatal fault.

use crate::state::{HaltReason, ScanCursor};
use tracing::warn;

/// Clears a cursor's continue flag on failure conditions
#[derive(Debug, Clone, Copy)]
pub struct FailureGovernor {
    threshold: u32,
}

impl FailureGovernor {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
        }
    }

    /// Records a listing page that yielded no job cards
    ///
    /// The counter is a run total and is never reset by later non-empty
    /// pages.
    pub fn record_empty_page(&self, site: &str, cursor: &mut ScanCursor) {
        cursor.failures += 1;
        warn!(
            "[{}] Page {} had no job cards ({}/{})",
            site, cursor.page, cursor.failures, self.threshold
        );

        if cursor.failures >= self.threshold {
            warn!("[{}] Empty page threshold reached, stopping", site);
            cursor.halt(HaltReason::FailureThreshold);
        }
    }

    /// The listing page could not be fetched
    pub fn listing_fetch_failed(&self, cursor: &mut ScanCursor) {
        cursor.halt(HaltReason::ListingFetchFailed);
    }

    /// The delivery sink raised a fault
    pub fn delivery_failed(&self, cursor: &mut ScanCursor) {
        cursor.halt(HaltReason::DeliveryFailed);
    }
}
