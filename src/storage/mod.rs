//! Storage module for persisting extracted jobs
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Per-record insert transactions with duplicate rejection
//! - Reading stored jobs back for reporting

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteJobStore;
pub use traits::{JobStore, StorageError, StorageResult};

use crate::record::JobRecord;
use crate::ScraperError;
use std::path::Path;

/// Opens or creates a job store at the given path
pub fn open_storage(path: &Path) -> Result<SqliteJobStore, ScraperError> {
    SqliteJobStore::new(path)
}

/// Outcome of inserting one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Row committed under the given id
    Inserted { id: i64 },

    /// Row rejected by a uniqueness constraint and rolled back
    Duplicate { reason: String },
}

/// A job as stored in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredJob {
    pub id: i64,
    pub job: JobRecord,
}

/// Inserts every record, each in its own transaction
///
/// A record rejected as a duplicate is logged and skipped; the rest of the
/// collection is still attempted. Any other database failure aborts.
///
/// # Arguments
///
/// * `store` - The job store
/// * `jobs` - Records collected by the run
/// * `added_at` - Run timestamp stamped on every committed row
///
/// # Returns
///
/// The committed records, in input order, carrying their `added_at` stamp
pub fn persist_jobs(
    store: &mut dyn JobStore,
    jobs: &[JobRecord],
    added_at: &str,
) -> Result<Vec<JobRecord>, ScraperError> {
    store.ensure_schema()?;

    let mut new_jobs = Vec::new();

    for job in jobs {
        match store.insert_job(job, added_at)? {
            InsertOutcome::Inserted { id } => {
                tracing::debug!("Committed job {} as row {}", job.apply_url, id);
                new_jobs.push(job.stamped(added_at));
            }
            InsertOutcome::Duplicate { reason } => {
                tracing::error!("Rejected {}: {}", job.apply_url, reason);
            }
        }
    }

    tracing::info!(
        "Persisted {} of {} job(s)",
        new_jobs.len(),
        jobs.len()
    );

    Ok(new_jobs)
}
