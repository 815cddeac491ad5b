//! State module for tracking scan progress
//!
//! # Components
//!
//! - `ScanState`: lifecycle of a site's scan (idle, running, halted)
//! - `HaltReason`: why a scan stopped
//! - `ScanCursor`: per-scan page, max page, failure counter and continue flag

mod cursor;
mod scan_state;

// Re-export main types
pub use cursor::ScanCursor;
pub use scan_state::{HaltReason, ScanState};
