//! Storage traits and error types
//!
//! This module defines the trait interface for dedup store backends and
//! associated error types.

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Persistent set of delivered posting URLs, scoped by delivery identity
///
/// Implementations are shared between concurrently running site scans and
/// must serialize access internally.
pub trait DedupStore: Send + Sync {
    /// Returns whether `url` was already recorded for `identity`
    fn exists(&self, url: &str, identity: &str) -> StorageResult<bool>;

    /// Records `url` for `identity`; recording an existing pair is a no-op
    fn insert(&self, url: &str, identity: &str) -> StorageResult<()>;

    /// Number of recorded URLs per identity, ordered by identity
    fn count_by_identity(&self) -> StorageResult<Vec<(String, u64)>>;
}
