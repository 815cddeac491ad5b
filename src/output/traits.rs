//! Delivery sink trait and error types
//!
//! This module defines the trait interface for delivery sinks, the
//! downstream consumers of scanned job postings.

use crate::record::CandidateRecord;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that abort delivery of a batch
///
/// A rejected batch is not an error; see `DeliverySink::deliver`.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Failed to reach delivery endpoint {endpoint}: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },

    #[error("Failed to serialize batch: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for delivery operations
pub type DeliveryResult<T> = Result<T, DeliveryError>;

/// Downstream consumer of record batches
#[async_trait]
pub trait DeliverySink: Send + Sync {
    /// Delivers one batch of records
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The batch was accepted
    /// * `Ok(false)` - The batch was not accepted; nothing may be marked seen
    /// * `Err(DeliveryError)` - The sink could not be reached
    async fn deliver(&self, records: &[CandidateRecord]) -> DeliveryResult<bool>;
}
