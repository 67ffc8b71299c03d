//! CSV export of collected jobs
//!
//! One header row, then one row per record in collection order. The columns
//! are the `JobRecord` fields.

use crate::record::JobRecord;
use crate::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes all records to a new CSV file
///
/// # Arguments
///
/// * `jobs` - Records to export
/// * `output_path` - Destination file, replaced if present
pub fn export_csv(jobs: &[JobRecord], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    write_csv(jobs, file)?;
    tracing::info!("Exported {} job(s) to {}", jobs.len(), output_path.display());
    Ok(())
}

/// Writes all records as CSV to any writer
pub fn write_csv<W: Write>(jobs: &[JobRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    if jobs.is_empty() {
        csv_writer.write_record([
            "title",
            "company",
            "salary",
            "summary",
            "location",
            "apply_url",
            "added_at",
        ])?;
    }

    for job in jobs {
        csv_writer.serialize(job)?;
    }

    csv_writer.flush()?;
    Ok(())
}
