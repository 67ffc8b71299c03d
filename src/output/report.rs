//! Console reports for committed and stored jobs

use crate::record::JobRecord;
use crate::storage::StoredJob;

/// Formats one committed job as a single report line
pub fn format_new_job(job: &JobRecord) -> String {
    format!(
        "new job: [{:?}, {:?}, {:?}, {:?}, {:?}, {:?}]",
        job.title, job.company, job.salary, job.summary, job.location, job.apply_url
    )
}

/// Prints the jobs committed by this run to stdout and the log
pub fn print_new_jobs(new_jobs: &[JobRecord]) {
    println!("new jobs:");
    tracing::info!("new jobs:");
    tracing::info!("--------");

    for job in new_jobs {
        let line = format_new_job(job);
        println!("{}", line);
        tracing::info!("{}", line);
    }
}

/// Prints a short listing of stored jobs, newest first
pub fn print_stored_jobs(jobs: &[StoredJob], limit: usize) {
    println!("Stored jobs: {}", jobs.len());

    for stored in jobs.iter().rev().take(limit) {
        println!(
            "  #{} {} | {} | {} | added {}",
            stored.id,
            stored.job.title,
            stored.job.company,
            stored.job.location,
            stored.job.added_at.as_deref().unwrap_or("-")
        );
    }
}
