//! Storage module for the dedup store
//!
//! This module persists which posting URLs were already delivered to which
//! delivery target:
//! - SQLite database initialization and schema management
//! - Visited URL lookups and inserts
//! - Per-identity counts for reporting

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{DedupStore, StorageError, StorageResult};

use crate::JobscanError;

use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(JobscanError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, JobscanError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    SqliteStorage::new(path)
}
