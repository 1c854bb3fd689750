//! Implementation of the 'reqpipe queue-stats' command.
//!
//! Prints aggregate per-state counts across the job queue.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial queue-stats command implementation.

pub async fn execute() -> anyhow::Result<()> {
    let db_url = crate::commands::database_url()?;
    let queue = job_queue::adapters::sqlite_job_queue_adapter::SqliteJobQueueAdapter::connect(&db_url, 5, 2)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;

    let stats = {
        use job_queue::ports::job_queue_port::JobQueuePort;
        queue.queue_stats().await
    }
    .map_err(|e| anyhow::anyhow!("Failed to read queue stats: {}", e))?;

    println!("waiting:   {}", stats.waiting);
    println!("active:    {}", stats.active);
    println!("completed: {}", stats.completed);
    println!("failed:    {}", stats.failed);
    println!("delayed:   {}", stats.delayed);
    println!("as of:     {}", stats.as_of);

    std::result::Result::Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queue_stats_on_empty_database() {
        let path = std::env::temp_dir().join(std::format!("reqpipe_cli_test_{}.db", uuid::Uuid::new_v4()));
        unsafe {
            std::env::set_var("DATABASE_URL", std::format!("sqlite:{}", path.display()));
        }
        let result = execute().await;
        assert!(result.is_ok());
    }
}
