//! Scan lifecycle definitions
//!
//! A site's scan moves `Idle -> Running -> Halted`. `Halted` is absorbing:
//! a halted scan is never resumed within the same process run.

use std::fmt;

/// Lifecycle state of one site's scan loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanState {
    /// Constructed, max-page discovery not yet done
    Idle,

    /// Fetching and delivering listing pages
    Running,

    /// Finished; see `HaltReason` for why
    Halted,
}

impl ScanState {
    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// `Idle -> Halted` is legal: a scan may halt before it starts, e.g. when
    /// max-page discovery fails.
    pub fn can_transition_to(&self, next: ScanState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running) | (Self::Idle, Self::Halted) | (Self::Running, Self::Halted)
        )
    }

    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Halted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Halted => "halted",
        }
    }
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a scan halted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HaltReason {
    /// The cursor moved past the discovered max page
    PagesExhausted,

    /// Too many listing pages came back without any job cards
    FailureThreshold,

    /// The listing page could not be fetched after all retries
    ListingFetchFailed,

    /// The delivery sink raised a fault
    DeliveryFailed,

    /// A bounded site's max page could not be discovered
    MaxPageUnknown,
}

impl HaltReason {
    /// Returns true if the halt reflects a failure rather than a finished scan
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::PagesExhausted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PagesExhausted => "pages_exhausted",
            Self::FailureThreshold => "failure_threshold",
            Self::ListingFetchFailed => "listing_fetch_failed",
            Self::DeliveryFailed => "delivery_failed",
            Self::MaxPageUnknown => "max_page_unknown",
        }
    }
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
