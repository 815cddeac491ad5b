//! Configuration module for Jobscan
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! and holds the runtime options resolved from the command line.
//!
//! # Example
//!
//! ```no_run
//! use jobscan::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("jobscan.toml")).unwrap();
//! println!("Configured sites: {}", config.sites.len());
//! ```

mod options;
mod parser;
mod types;
mod validation;

// Re-export types
pub use options::RunOptions;
pub use types::{
    AttributeRule, Config, DeliveryConfig, ExtractionRules, FetcherConfig, FieldQuery,
    LabelledQuery, PageEncoding, PaginationRule, PaginationStyle, QueryMode, ScanConfig,
    SiteDescriptor, StorageConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
