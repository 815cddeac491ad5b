use crate::state::HaltReason;

/// Mutable pagination and failure state of one site's scan
///
/// Owned exclusively by a single scan loop and never shared. The continue
/// flag starts out true and, once cleared, is never set again; the first
/// reason recorded is kept.
#[derive(Debug, Clone)]
pub struct ScanCursor {
    /// Current logical page number
    pub page: u32,

    /// Last page to scan; 0 means unknown or unbounded
    pub max_page: u32,

    /// Listing pages that yielded no job cards during this run
    pub failures: u32,

    continue_scan: bool,
    halt_reason: Option<HaltReason>,
}

impl ScanCursor {
    /// Creates a cursor positioned at `start_page`
    pub fn new(start_page: u32) -> Self {
        Self {
            page: start_page,
            max_page: 0,
            failures: 0,
            continue_scan: true,
            halt_reason: None,
        }
    }

    /// Clears the continue flag
    ///
    /// Calling this on an already halted cursor keeps the original reason.
    pub fn halt(&mut self, reason: HaltReason) {
        if self.continue_scan {
            self.continue_scan = false;
            self.halt_reason = Some(reason);
        }
    }

    /// Returns the raw continue flag
    pub fn is_continuing(&self) -> bool {
        self.continue_scan
    }

    /// Returns why the cursor was halted, if it was
    pub fn halt_reason(&self) -> Option<HaltReason> {
        self.halt_reason
    }
}
