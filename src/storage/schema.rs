//! Database schema definitions
//!
//! This module contains the SQL schema for the Job-Trawler database.

/// SQL schema for the database
///
/// `location` and `apply_url` are each unique on their own; a row violating
/// either is rejected as a whole.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS jobs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    company TEXT NOT NULL,
    salary TEXT,
    summary TEXT,
    location TEXT NOT NULL UNIQUE,
    apply_url TEXT UNIQUE,
    added_at TEXT
);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
