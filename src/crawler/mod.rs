//! Crawler module for job search pages and postings
//!
//! This module contains the core crawling logic, including:
//! - Identity rotation for outbound requests
//! - HTTP fetching and document parsing
//! - Link discovery on search-result pages
//! - Field extraction on detail pages
//! - Overall pipeline coordination

mod coordinator;
mod discover;
mod extract;
mod fetcher;
mod identity;

pub use coordinator::{
    build_search_url, page_offsets, push_unique, site_origin, Pipeline, PipelineOutput,
};
pub use discover::{
    discover_in_markup, DiscoveryError, LinkDiscoverer, MarkerFragmentDiscoverer, LINK_MARKER,
    MARKER_PATTERN_VERSION,
};
pub use extract::{text_or_default, DetailExtractor};
pub use fetcher::{build_http_client, Fetcher};
pub use identity::{HeaderSet, IdentityRotator};

use crate::config::Config;
use crate::output::{export_csv, print_new_jobs, RunLabel};
use crate::record::JobRecord;
use crate::storage::{open_storage, persist_jobs};
use crate::Result;
use chrono::Local;
use std::path::{Path, PathBuf};

/// What a complete run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Every record collected by the pipeline
    pub jobs: Vec<JobRecord>,

    /// Secure apply URLs among the collected records
    pub apply_links: Vec<String>,

    /// Records committed to the store by this run
    pub new_jobs: Vec<JobRecord>,

    pub export_path: PathBuf,
    pub database_path: PathBuf,
}

/// Runs a complete crawl
///
/// This is the main entry point for a run. It will:
/// 1. Walk the search pages and extract every linked posting
/// 2. Export all collected records to CSV
/// 3. Insert them into the store, one transaction per record
/// 4. Report the records that were new
///
/// A fetch failure ends the run before anything is written.
pub async fn run_pipeline(config: &Config) -> Result<RunSummary> {
    let pipeline = Pipeline::new(config)?;
    let output = pipeline.run().await?;

    let label = RunLabel::new(&config.search, Local::now());
    let directory = Path::new(&config.output.directory);

    let export_path = directory.join(label.export_file_name());
    export_csv(&output.jobs, &export_path)?;

    let database_path = directory.join(label.database_file_name());
    let mut store = open_storage(&database_path)?;
    let new_jobs = persist_jobs(&mut store, &output.jobs, label.timestamp())?;

    print_new_jobs(&new_jobs);

    Ok(RunSummary {
        jobs: output.jobs,
        apply_links: output.apply_links,
        new_jobs,
        export_path,
        database_path,
    })
}
