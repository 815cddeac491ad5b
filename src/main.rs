//! Jobscan main entry point
//!
//! This is the command-line interface for the Jobscan job-listing scanner.

use clap::Parser;
use jobscan::config::{load_config_with_hash, Config, PaginationStyle, RunOptions};
use jobscan::crawler::crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Jobscan: a job-listing scanner
///
/// Jobscan walks the listing pages of the configured job sites, extracts
/// each new posting from its detail page and posts the postings to a REST
/// API. Postings already delivered to the same API are skipped.
#[derive(Parser, Debug)]
#[command(name = "jobscan")]
#[command(version = "1.0.0")]
#[command(about = "A job-listing scanner", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Log every extracted posting
    #[arg(long)]
    debug: bool,

    /// Listing page to start every site at
    #[arg(long, value_name = "N")]
    start_page: Option<u32>,

    /// Comma-separated list of site names to skip
    #[arg(long, value_name = "SITES")]
    disabled_sites: Option<String>,

    /// Scan without posting anything; nothing is marked as seen
    #[arg(long)]
    disable_delivery: bool,

    /// Validate config and show what would be scanned without scanning
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the dedup database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet, cli.debug);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let options = RunOptions {
        disabled_sites: cli
            .disabled_sites
            .as_deref()
            .map(RunOptions::parse_disabled_sites)
            .unwrap_or_default(),
        start_page: cli.start_page,
        debug: cli.debug,
    };

    if cli.disable_delivery {
        config.delivery.enabled = false;
    }

    if cli.dry_run {
        handle_dry_run(&config, &options);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_scan(config, options).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool, debug: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match (verbose, debug) {
            (0, false) => EnvFilter::new("jobscan=info,warn"),
            (0, true) | (1, _) => EnvFilter::new("jobscan=debug,info"),
            (2, _) => EnvFilter::new("jobscan=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be scanned
fn handle_dry_run(config: &Config, options: &RunOptions) {
    println!("=== Jobscan Dry Run ===\n");

    println!("Fetcher Configuration:");
    println!("  User agent: {}", config.fetcher.user_agent);
    println!("  Accept-Language: {}", config.fetcher.accept_language);
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    println!(
        "  Attempts: {} ({}ms apart)",
        config.fetcher.max_tries, config.fetcher.retry_delay_ms
    );
    println!("  Empty page threshold: {}", config.scan.failure_threshold);

    println!("\nDelivery:");
    if config.delivery.enabled {
        println!("  Endpoint: {}", config.delivery.endpoint());
        println!("  Request parameter: {}", config.delivery.request_param);
    } else {
        println!("  Disabled");
    }
    println!("  Dedup identity: {}", config.delivery.identity());
    println!("  Database: {}", config.storage.database_path);

    println!("\nSites ({}):", config.sites.len());
    for site in &config.sites {
        let status = if options.is_disabled(&site.name) {
            " [disabled]"
        } else {
            ""
        };
        let pagination = match site.pagination {
            PaginationStyle::Open => "open",
            PaginationStyle::Bounded => "bounded",
        };
        println!("  - {} ({}){}", site.name, pagination, status);
        println!("    * {}", site.base_url);
        println!("    * {}", site.paged_url);
    }

    if let Some(page) = options.start_page {
        println!("\nStarting every site at page {}", page);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows visited URL counts from the database
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use jobscan::output::print_statistics;
    use jobscan::storage::SqliteStorage;
    use std::path::Path;

    println!("Database: {}\n", config.storage.database_path);

    let storage = SqliteStorage::new(Path::new(&config.storage.database_path))?;
    print_statistics(&storage)?;

    Ok(())
}

/// Handles the normal scanning mode
async fn handle_scan(
    config: Config,
    options: RunOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    use jobscan::output::print_reports;

    let reports = crawl(config, options).await?;

    for report in &reports {
        if let Some(reason) = report.halt_reason.filter(|reason| reason.is_failure()) {
            tracing::warn!("Site '{}' stopped early: {}", report.site, reason);
        }
    }

    print_reports(&reports);
    Ok(())
}
