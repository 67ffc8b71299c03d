//! Output module for run artifacts
//!
//! This module handles:
//! - Naming the export file and database after the run parameters
//! - Writing the CSV export of all collected jobs
//! - Reporting newly committed jobs

mod csv_export;
mod report;

pub use csv_export::{export_csv, write_csv};
pub use report::{format_new_job, print_new_jobs, print_stored_jobs};

use crate::config::SearchConfig;
use chrono::{DateTime, Local};

/// Names derived once per run from the search parameters and start time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLabel {
    stem: String,
    timestamp: String,
}

impl RunLabel {
    /// Builds the label for a run
    ///
    /// The timestamp keeps microseconds so two runs started within the same
    /// second still get distinct export files.
    pub fn new(search: &SearchConfig, now: DateTime<Local>) -> Self {
        Self {
            stem: run_stem(search),
            timestamp: now.format("%Y-%m-%d_%H_%M_%S_%6f").to_string(),
        }
    }

    /// `job_offers_{city}_{radius}_miles_{must_contain}`
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Run timestamp, also used as the `added_at` value of committed rows
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn export_file_name(&self) -> String {
        format!("{}_{}.csv", self.stem, self.timestamp)
    }

    /// The store is shared by all runs with the same search parameters
    pub fn database_file_name(&self) -> String {
        format!("indeed_jobs__{}.sqlite3", self.stem)
    }
}

fn run_stem(search: &SearchConfig) -> String {
    format!(
        "job_offers_{}_{}_miles_{}",
        search.city, search.radius, search.must_contain
    )
}
