//! Implementation of the 'reqpipe queue-clean' command.
//!
//! Deletes terminal (completed/failed) jobs older than a grace period,
//! keeping the `jobs` table from growing without bound.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial queue-clean command implementation.

pub async fn execute(grace_secs: i64) -> anyhow::Result<()> {
    if grace_secs < 0 {
        anyhow::bail!("grace_secs must not be negative.");
    }

    let db_url = crate::commands::database_url()?;
    let queue = job_queue::adapters::sqlite_job_queue_adapter::SqliteJobQueueAdapter::connect(&db_url, 5, 2)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;

    let removed = {
        use job_queue::ports::job_queue_port::JobQueuePort;
        queue.clean_queue(grace_secs).await
    }
    .map_err(|e| anyhow::anyhow!("Failed to clean queue: {}", e))?;

    println!("Removed {} terminal job(s) older than {}s.", removed, grace_secs);

    std::result::Result::Ok(())
}
