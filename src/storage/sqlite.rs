//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the DedupStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{DedupStore, StorageError, StorageResult};
use crate::JobscanError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite storage backend
///
/// The connection sits behind a mutex so one store can be shared by every
/// site scan.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(JobscanError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, JobscanError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, JobscanError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Database("connection mutex poisoned".to_string()))
    }
}

impl DedupStore for SqliteStorage {
    fn exists(&self, url: &str, identity: &str) -> StorageResult<bool> {
        let conn = self.lock()?;
        let found = conn
            .query_row(
                "SELECT 1 FROM visited_urls WHERE url = ?1 AND identity = ?2",
                params![url, identity],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn insert(&self, url: &str, identity: &str) -> StorageResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR IGNORE INTO visited_urls (url, identity, visited_at) VALUES (?1, ?2, ?3)",
            params![url, identity, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn count_by_identity(&self) -> StorageResult<Vec<(String, u64)>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT identity, COUNT(*) FROM visited_urls GROUP BY identity ORDER BY identity",
        )?;

        let counts = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(counts)
    }
}
