//! Job-Trawler main entry point
//!
//! This is the command-line interface for the Job-Trawler crawler.

use chrono::Local;
use clap::Parser;
use job_trawler::config::{load_config_with_hash, validate, Config};
use job_trawler::crawler::{build_search_url, page_offsets, run_pipeline, site_origin};
use job_trawler::output::{print_stored_jobs, RunLabel};
use job_trawler::storage::{open_storage, JobStore};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Job-Trawler: a two-stage job listing crawler
///
/// Walks the search results of a national job site, extracts each linked
/// posting and stores the results in a CSV export and a SQLite database.
#[derive(Parser, Debug)]
#[command(name = "job-trawler")]
#[command(version = "1.0.0")]
#[command(about = "A two-stage job listing crawler", long_about = None)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// National site to search (subdomain, e.g. "de")
    #[arg(long)]
    locale: Option<String>,

    /// Number of job ads to walk through
    #[arg(long)]
    count: Option<u32>,

    /// City to search around
    #[arg(long)]
    city: Option<String>,

    /// Search radius around the city
    #[arg(long)]
    radius: Option<u32>,

    /// Term every result must contain
    #[arg(long)]
    must_contain: Option<String>,

    /// Search term
    #[arg(long)]
    query: Option<String>,

    /// Directory for the export, database and log file
    #[arg(long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the search pages that would be fetched
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show jobs stored for these search parameters and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(locale) = &self.locale {
            config.search.locale = locale.clone();
        }
        if let Some(count) = self.count {
            config.search.count = count;
        }
        if let Some(city) = &self.city {
            config.search.city = city.clone();
        }
        if let Some(radius) = self.radius {
            config.search.radius = radius;
        }
        if let Some(must_contain) = &self.must_contain {
            config.search.must_contain = must_contain.clone();
        }
        if let Some(query) = &self.query {
            config.search.query = query.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output.directory = output_dir.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };
    cli.apply_overrides(&mut config);
    validate(&config)?;

    std::fs::create_dir_all(&config.output.directory)?;
    let log_path = Path::new(&config.output.directory).join(&config.output.log_file);
    setup_logging(cli.verbose, cli.quiet, &log_path)?;

    if let (Some(path), Some(hash)) = (&cli.config, &config_hash) {
        tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            hash
        );
    }

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(&config).await?;
    }

    Ok(())
}

/// Sets up console and append-only file logging
fn setup_logging(verbose: u8, quiet: bool, log_path: &Path) -> std::io::Result<()> {
    let directive = if quiet {
        "error"
    } else {
        match verbose {
            0 => "job_trawler=info,warn",
            1 => "job_trawler=debug,info",
            2 => "job_trawler=trace,debug",
            _ => "trace",
        }
    };

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    tracing_subscriber::registry()
        .with(EnvFilter::new(directive))
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .init();

    Ok(())
}

/// Handles the --dry-run mode: shows settings and the planned search pages
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Job-Trawler Dry Run ===\n");

    println!("Search:");
    println!("  Locale: {}", config.search.locale);
    println!("  Query: {}", config.search.query);
    println!("  City: {}", config.search.city);
    println!("  Radius: {}", config.search.radius);
    println!("  Must contain: {:?}", config.search.must_contain);
    println!("  Count: {}", config.search.count);
    println!("  Page delay: {}ms", config.search.page_delay_ms);

    println!("\nIdentities: {}", config.identity.len());

    let label = RunLabel::new(&config.search, Local::now());
    let directory = Path::new(&config.output.directory);
    println!("\nOutput:");
    println!("  Export: {}", directory.join(label.export_file_name()).display());
    println!("  Database: {}", directory.join(label.database_file_name()).display());

    let origin = site_origin(&config.search);
    let offsets = page_offsets(config.search.count, config.search.page_size);
    println!("\nSearch pages ({}):", offsets.len());
    for offset in offsets {
        println!("  - {}", build_search_url(&origin, &config.search, offset)?);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --stats mode: lists jobs stored for these search parameters
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let label = RunLabel::new(&config.search, Local::now());
    let database_path = Path::new(&config.output.directory).join(label.database_file_name());

    if !database_path.exists() {
        println!("No database at {}", database_path.display());
        return Ok(());
    }

    println!("Database: {}\n", database_path.display());
    let store = open_storage(&database_path)?;
    print_stored_jobs(&store.load_jobs()?, 20);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Starting run: locale={}, city={}, radius={}, must_contain={:?}, count={}",
        config.search.locale,
        config.search.city,
        config.search.radius,
        config.search.must_contain,
        config.search.count
    );

    match run_pipeline(config).await {
        Ok(summary) => {
            tracing::info!(
                "Run completed: {} job(s) collected, {} new, export {}, database {}",
                summary.jobs.len(),
                summary.new_jobs.len(),
                summary.export_path.display(),
                summary.database_path.display()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}
