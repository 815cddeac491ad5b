//! Database schema definitions
//!
//! This module contains the SQL schema of the Jobscan dedup database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Postings already delivered, per delivery target
CREATE TABLE IF NOT EXISTS visited_urls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    identity TEXT NOT NULL,
    visited_at TEXT NOT NULL,
    UNIQUE(url, identity)
);

CREATE INDEX IF NOT EXISTS idx_visited_identity ON visited_urls(identity);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
