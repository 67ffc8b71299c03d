//! Storage traits and error types
//!
//! This module defines the trait interface for job store backends and
//! associated error types.

use crate::record::JobRecord;
use crate::storage::{InsertOutcome, StoredJob};
use thiserror::Error;

/// Errors that can occur during storage operations
///
/// Uniqueness violations are not errors; they are reported through
/// [`InsertOutcome::Duplicate`].
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for job store implementations
///
/// Every insert is its own transaction: it either commits the whole row or
/// rolls back and leaves the store untouched.
pub trait JobStore {
    /// Creates the jobs table if it does not exist yet
    fn ensure_schema(&mut self) -> StorageResult<()>;

    /// Inserts one record in its own transaction
    ///
    /// # Arguments
    ///
    /// * `job` - The record to store
    /// * `added_at` - Timestamp stamped on the row
    ///
    /// # Returns
    ///
    /// * `Ok(InsertOutcome::Inserted)` - Row committed
    /// * `Ok(InsertOutcome::Duplicate)` - Unique constraint hit, rolled back
    /// * `Err(StorageError)` - Any other database failure
    fn insert_job(&mut self, job: &JobRecord, added_at: &str) -> StorageResult<InsertOutcome>;

    /// Gets every stored row in insertion order
    fn load_jobs(&self) -> StorageResult<Vec<StoredJob>>;

    /// Gets a stored row by its apply URL
    fn get_job_by_apply_url(&self, apply_url: &str) -> StorageResult<Option<StoredJob>>;

    /// Counts stored rows
    fn count_jobs(&self) -> StorageResult<u64>;
}
