//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the JobStore trait.

use crate::record::JobRecord;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{JobStore, StorageResult};
use crate::storage::{InsertOutcome, StoredJob};
use crate::ScraperError;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::Path;

const SELECT_JOB_COLUMNS: &str =
    "SELECT id, title, company, salary, summary, location, apply_url, added_at FROM jobs";

/// SQLite job store
///
/// The connection is opened once and reused for every per-record
/// transaction.
pub struct SqliteJobStore {
    conn: Connection,
}

impl SqliteJobStore {
    /// Opens or creates the database file and ensures the schema exists
    pub fn new(path: &Path) -> Result<Self, ScraperError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, ScraperError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl JobStore for SqliteJobStore {
    fn ensure_schema(&mut self) -> StorageResult<()> {
        initialize_schema(&self.conn)?;
        Ok(())
    }

    fn insert_job(&mut self, job: &JobRecord, added_at: &str) -> StorageResult<InsertOutcome> {
        let tx = self.conn.transaction()?;

        let inserted = tx.execute(
            "INSERT INTO jobs (title, company, salary, summary, location, apply_url, added_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                job.title,
                job.company,
                job.salary,
                job.summary,
                job.location,
                job.apply_url,
                added_at
            ],
        );

        match inserted {
            Ok(_) => {
                let id = tx.last_insert_rowid();
                tx.commit()?;
                Ok(InsertOutcome::Inserted { id })
            }
            Err(e) if is_constraint_violation(&e) => {
                tx.rollback()?;
                Ok(InsertOutcome::Duplicate {
                    reason: e.to_string(),
                })
            }
            // Dropping the transaction rolls it back
            Err(e) => Err(e.into()),
        }
    }

    fn load_jobs(&self) -> StorageResult<Vec<StoredJob>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY id", SELECT_JOB_COLUMNS))?;

        let jobs = stmt
            .query_map([], stored_job_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(jobs)
    }

    fn get_job_by_apply_url(&self, apply_url: &str) -> StorageResult<Option<StoredJob>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE apply_url = ?1", SELECT_JOB_COLUMNS))?;

        let job = stmt
            .query_row(params![apply_url], stored_job_from_row)
            .optional()?;

        Ok(job)
    }

    fn count_jobs(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM jobs", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn stored_job_from_row(row: &Row<'_>) -> rusqlite::Result<StoredJob> {
    Ok(StoredJob {
        id: row.get(0)?,
        job: JobRecord {
            title: row.get(1)?,
            company: row.get(2)?,
            salary: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            summary: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            location: row.get(5)?,
            apply_url: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
            added_at: row.get(7)?,
        },
    })
}

fn is_constraint_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(failure, _) if failure.code == ErrorCode::ConstraintViolation
    )
}
