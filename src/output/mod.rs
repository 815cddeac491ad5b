//! Output module for delivering postings and reporting scan results
//!
//! This module handles:
//! - Delivering record batches to the downstream REST API
//! - Per-site scan reports
//! - Dedup store statistics

mod rest;
pub mod stats;
mod traits;

pub use rest::{DisabledSink, RestApiSink};
pub use stats::{print_reports, print_statistics, ScanReport};
pub use traits::{DeliveryError, DeliveryResult, DeliverySink};
