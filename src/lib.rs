//! Jobscan: a job-listing scanner
//!
//! This crate crawls a fixed set of job-listing sites page by page, extracts
//! structured job postings from their HTML, skips postings that were already
//! delivered, and forwards new postings to a downstream REST API.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod record;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Jobscan operations
#[derive(Debug, Error)]
pub enum JobscanError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Extraction error: {0}")]
    Extract(#[from] extract::ExtractError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid scan state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::ScanState,
        to: state::ScanState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector for site '{site}' ({field}): {selector}")]
    InvalidSelector {
        site: String,
        field: String,
        selector: String,
    },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("URL template is missing the {{page}} placeholder: {0}")]
    MissingPlaceholder(String),
}

/// Result type alias for Jobscan operations
pub type Result<T> = std::result::Result<T, JobscanError>;

// Re-export commonly used types
pub use config::{Config, RunOptions};
pub use record::CandidateRecord;
pub use state::{ScanCursor, ScanState};
