//! Dedup gate in front of the visited-URL store

use crate::record::CandidateRecord;
use crate::storage::DedupStore;
use std::sync::Arc;
use tracing::error;

/// Filters out postings already delivered to the current delivery target
///
/// Store failures never stop a scan: a failed lookup counts as "not seen"
/// and a failed insert is only logged.
#[derive(Clone)]
pub struct DedupGate {
    store: Arc<dyn DedupStore>,
    identity: String,
}

impl DedupGate {
    pub fn new(store: Arc<dyn DedupStore>, identity: impl Into<String>) -> Self {
        Self {
            store,
            identity: identity.into(),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Returns whether `url` was already delivered
    pub fn is_seen(&self, url: &str) -> bool {
        match self.store.exists(url, &self.identity) {
            Ok(seen) => seen,
            Err(e) => {
                error!("Dedup lookup failed for {}: {}", url, e);
                false
            }
        }
    }

    /// Records every record of a delivered batch
    pub fn mark_seen(&self, records: &[CandidateRecord]) {
        for record in records {
            if let Err(e) = self.store.insert(&record.url, &self.identity) {
                error!("Failed to record {} as visited: {}", record.url, e);
            }
        }
    }
}
