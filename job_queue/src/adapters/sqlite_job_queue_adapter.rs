//! SQLite-backed job queue adapter.
//!
//! Connects its own single-connection pool to the same database file the
//! `requirement_store` crate's `SqliteTaskAdapter` created the `jobs` table
//! in. It never inserts a job row itself (`create_task_and_enqueue_async`
//! owns that, atomically with the task row); this adapter only dequeues,
//! updates, and retires rows that already exist. Durability is delegated
//! entirely to the shared SQLite file, matching the project's stance that
//! no distributed consensus layer is needed between the two crates.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial SqliteJobQueueAdapter with dequeue/retry/stats/cleanup.

#[derive(hexser::HexAdapter)]
pub struct SqliteJobQueueAdapter {
    pool: sqlx::Pool<sqlx::Sqlite>,
    max_attempts: u32,
    initial_backoff_secs: u64,
}

impl SqliteJobQueueAdapter {
    /// Returns a reference to the underlying SQLite pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Sqlite> {
        &self.pool
    }

    pub async fn connect(database_url: &str, max_attempts: u32, initial_backoff_secs: u64) -> std::result::Result<Self, std::string::String> {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .map_err(|e| std::format!("Failed to connect SQLite: {:?}", e))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS jobs (
                id TEXT PRIMARY KEY,
                task_id TEXT NOT NULL,
                priority INTEGER NOT NULL,
                attempts INTEGER NOT NULL DEFAULT 0,
                last_error TEXT NULL,
                state TEXT NOT NULL,
                heartbeat_at TEXT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .map_err(|e| std::format!("Failed to create jobs schema: {:?}", e))?;

        // Added after the initial schema; ignore the error on databases that already have it.
        let _ = sqlx::query("ALTER TABLE jobs ADD COLUMN delayed_until TEXT NULL").execute(&pool).await;

        std::result::Result::Ok(Self { pool, max_attempts, initial_backoff_secs })
    }

    fn provider_error(context: &str, e: sqlx::Error) -> pipeline_core::PipelineError {
        pipeline_core::PipelineError::provider_retryable("sqlite-job-queue", std::format!("{}: {:?}", context, e))
    }

    fn backoff_secs(&self, attempts_so_far: u32) -> i64 {
        let exponent = attempts_so_far.saturating_sub(1);
        let multiplier = 1u64.checked_shl(exponent).unwrap_or(u64::MAX);
        self.initial_backoff_secs.saturating_mul(multiplier) as i64
    }

    fn row_to_job(row: &sqlx::sqlite::SqliteRow) -> std::result::Result<crate::domain::job::Job, pipeline_core::PipelineError> {
        let id: String = sqlx::Row::get(row, 0);
        let priority: i64 = sqlx::Row::get(row, 1);
        let attempts: i64 = sqlx::Row::get(row, 2);
        let last_error: std::option::Option<String> = sqlx::Row::get(row, 3);
        let state_str: String = sqlx::Row::get(row, 4);
        let state = crate::domain::job_state::JobState::parse(state_str.as_str())
            .ok_or_else(|| pipeline_core::PipelineError::provider_parse("sqlite-job-queue", std::format!("unknown job state {}", state_str)))?;
        let heartbeat_at_str: std::option::Option<String> = sqlx::Row::get(row, 5);
        let heartbeat_at = heartbeat_at_str
            .map(|s| chrono::DateTime::parse_from_rfc3339(s.as_str()).map(|dt| dt.with_timezone(&chrono::Utc)))
            .transpose()
            .map_err(|e| pipeline_core::PipelineError::provider_parse("sqlite-job-queue", std::format!("time parse: {:?}", e)))?;
        let created_at_str: String = sqlx::Row::get(row, 6);
        let created_at = chrono::DateTime::parse_from_rfc3339(created_at_str.as_str())
            .map_err(|e| pipeline_core::PipelineError::provider_parse("sqlite-job-queue", std::format!("time parse: {:?}", e)))?
            .with_timezone(&chrono::Utc);
        let updated_at_str: String = sqlx::Row::get(row, 7);
        let updated_at = chrono::DateTime::parse_from_rfc3339(updated_at_str.as_str())
            .map_err(|e| pipeline_core::PipelineError::provider_parse("sqlite-job-queue", std::format!("time parse: {:?}", e)))?
            .with_timezone(&chrono::Utc);

        std::result::Result::Ok(crate::domain::job::Job {
            id,
            priority,
            attempts: attempts as u32,
            last_error,
            state,
            heartbeat_at,
            created_at,
            updated_at,
        })
    }
}

#[async_trait::async_trait]
impl crate::ports::job_queue_port::JobQueuePort for SqliteJobQueueAdapter {
    async fn dequeue_next(&self) -> std::result::Result<std::option::Option<crate::domain::job::Job>, pipeline_core::PipelineError> {
        let row = sqlx::query(
            "SELECT id, priority, attempts, last_error, state, heartbeat_at, created_at, updated_at
             FROM jobs WHERE state = 'waiting' ORDER BY priority ASC, created_at ASC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::provider_error("dequeue select", e))?;

        let std::option::Option::Some(row) = row else {
            return std::result::Result::Ok(std::option::Option::None);
        };
        let mut job = Self::row_to_job(&row)?;

        let now = chrono::Utc::now();
        let now_str = now.to_rfc3339();
        sqlx::query("UPDATE jobs SET state = 'active', attempts = attempts + 1, heartbeat_at = ?1, updated_at = ?1 WHERE id = ?2")
            .bind(&now_str)
            .bind(&job.id)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::provider_error("dequeue update", e))?;

        job.state = crate::domain::job_state::JobState::Active;
        job.attempts += 1;
        job.heartbeat_at = std::option::Option::Some(now);
        job.updated_at = now;
        std::result::Result::Ok(std::option::Option::Some(job))
    }

    async fn heartbeat(&self, job_id: &str) -> std::result::Result<(), pipeline_core::PipelineError> {
        let now = chrono::Utc::now().to_rfc3339();
        sqlx::query("UPDATE jobs SET heartbeat_at = ?1, updated_at = ?1 WHERE id = ?2 AND state = 'active'")
            .bind(&now)
            .bind(job_id)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::provider_error("heartbeat", e))?;
        std::result::Result::Ok(())
    }

    async fn mark_completed(&self, job_id: &str) -> std::result::Result<(), pipeline_core::PipelineError> {
        let now = chrono::Utc::now().to_rfc3339();
        sqlx::query("UPDATE jobs SET state = 'completed', updated_at = ?1 WHERE id = ?2")
            .bind(&now)
            .bind(job_id)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::provider_error("mark_completed", e))?;
        std::result::Result::Ok(())
    }

    async fn mark_failed(&self, job_id: &str, error_message: &str) -> std::result::Result<crate::domain::job_state::JobState, pipeline_core::PipelineError> {
        let attempts: i64 = sqlx::query_scalar("SELECT attempts FROM jobs WHERE id = ?1")
            .bind(job_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::provider_error("mark_failed select", e))?;

        let now = chrono::Utc::now();
        let now_str = now.to_rfc3339();

        if (attempts as u32) >= self.max_attempts {
            sqlx::query("UPDATE jobs SET state = 'failed', last_error = ?1, updated_at = ?2 WHERE id = ?3")
                .bind(error_message)
                .bind(&now_str)
                .bind(job_id)
                .execute(&self.pool)
                .await
                .map_err(|e| Self::provider_error("mark_failed update", e))?;
            std::result::Result::Ok(crate::domain::job_state::JobState::Failed)
        } else {
            let delay = self.backoff_secs(attempts as u32);
            let delayed_until = (now + chrono::Duration::seconds(delay)).to_rfc3339();
            sqlx::query("UPDATE jobs SET state = 'delayed', last_error = ?1, delayed_until = ?2, updated_at = ?3 WHERE id = ?4")
                .bind(error_message)
                .bind(&delayed_until)
                .bind(&now_str)
                .bind(job_id)
                .execute(&self.pool)
                .await
                .map_err(|e| Self::provider_error("mark_failed update", e))?;
            std::result::Result::Ok(crate::domain::job_state::JobState::Delayed)
        }
    }

    async fn promote_ready_delayed(&self) -> std::result::Result<u64, pipeline_core::PipelineError> {
        let now = chrono::Utc::now().to_rfc3339();
        let result = sqlx::query("UPDATE jobs SET state = 'waiting', updated_at = ?1 WHERE state = 'delayed' AND delayed_until <= ?1")
            .bind(&now)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::provider_error("promote_ready_delayed", e))?;
        std::result::Result::Ok(result.rows_affected())
    }

    async fn recover_stalled(&self, stale_after_secs: i64) -> std::result::Result<u64, pipeline_core::PipelineError> {
        let cutoff = (chrono::Utc::now() - chrono::Duration::seconds(stale_after_secs)).to_rfc3339();
        let now = chrono::Utc::now().to_rfc3339();
        let result = sqlx::query("UPDATE jobs SET state = 'waiting', updated_at = ?1 WHERE state = 'active' AND heartbeat_at < ?2")
            .bind(&now)
            .bind(&cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::provider_error("recover_stalled", e))?;
        std::result::Result::Ok(result.rows_affected())
    }

    async fn job_status(&self, job_id: &str) -> std::result::Result<crate::domain::queue_stats::JobStatusView, pipeline_core::PipelineError> {
        let state: std::option::Option<String> = sqlx::query_scalar("SELECT state FROM jobs WHERE id = ?1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::provider_error("job_status select", e))?;

        let std::option::Option::Some(state) = state else {
            return std::result::Result::Ok(crate::domain::queue_stats::JobStatusView::not_found());
        };

        let progress: std::option::Option<f64> = sqlx::query_scalar("SELECT progress FROM requirement_tasks WHERE id = ?1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or(std::option::Option::None);

        std::result::Result::Ok(crate::domain::queue_stats::JobStatusView { state, progress })
    }

    async fn queue_stats(&self) -> std::result::Result<crate::domain::queue_stats::QueueStats, pipeline_core::PipelineError> {
        let rows: std::vec::Vec<(String, i64)> = sqlx::query_as("SELECT state, COUNT(*) FROM jobs GROUP BY state")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Self::provider_error("queue_stats", e))?;

        let mut stats = crate::domain::queue_stats::QueueStats {
            waiting: 0,
            active: 0,
            completed: 0,
            failed: 0,
            delayed: 0,
            as_of: chrono::Utc::now(),
        };
        for (state, count) in rows {
            match state.as_str() {
                "waiting" => stats.waiting = count,
                "active" => stats.active = count,
                "completed" => stats.completed = count,
                "failed" => stats.failed = count,
                "delayed" => stats.delayed = count,
                _ => {}
            }
        }
        std::result::Result::Ok(stats)
    }

    async fn clean_queue(&self, grace_secs: i64) -> std::result::Result<u64, pipeline_core::PipelineError> {
        let cutoff = (chrono::Utc::now() - chrono::Duration::seconds(grace_secs)).to_rfc3339();
        let result = sqlx::query("DELETE FROM jobs WHERE state IN ('completed', 'failed') AND updated_at < ?1")
            .bind(&cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::provider_error("clean_queue", e))?;
        std::result::Result::Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::job_queue_port::JobQueuePort;

    async fn seed_job(pool: &sqlx::Pool<sqlx::Sqlite>, id: &str, priority: i64, created_at: &str) {
        sqlx::query(
            "INSERT INTO jobs (id, task_id, priority, attempts, last_error, state, heartbeat_at, created_at, updated_at)
             VALUES (?1, ?1, ?2, 0, NULL, 'waiting', NULL, ?3, ?3)",
        )
        .bind(id)
        .bind(priority)
        .bind(created_at)
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_dequeue_next_respects_priority_ordering() {
        let adapter = SqliteJobQueueAdapter::connect("sqlite::memory:", 3, 5).await.unwrap();
        seed_job(&adapter.pool, "low", 4, "2026-01-01T00:00:00Z").await;
        seed_job(&adapter.pool, "critical", 1, "2026-01-01T00:00:01Z").await;
        seed_job(&adapter.pool, "medium", 3, "2026-01-01T00:00:02Z").await;

        let first = adapter.dequeue_next().await.unwrap().unwrap();
        assert_eq!(first.id, "critical");
        assert_eq!(first.attempts, 1);
    }

    #[tokio::test]
    async fn test_dequeue_next_returns_none_when_empty() {
        let adapter = SqliteJobQueueAdapter::connect("sqlite::memory:", 3, 5).await.unwrap();
        assert!(adapter.dequeue_next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mark_failed_retries_until_max_attempts_then_fails() {
        let adapter = SqliteJobQueueAdapter::connect("sqlite::memory:", 2, 5).await.unwrap();
        seed_job(&adapter.pool, "t1", 3, "2026-01-01T00:00:00Z").await;

        adapter.dequeue_next().await.unwrap().unwrap();
        let outcome1 = adapter.mark_failed("t1", "boom").await.unwrap();
        assert_eq!(outcome1, crate::domain::job_state::JobState::Delayed);

        sqlx::query("UPDATE jobs SET state = 'waiting' WHERE id = 't1'").execute(&adapter.pool).await.unwrap();
        adapter.dequeue_next().await.unwrap().unwrap();
        let outcome2 = adapter.mark_failed("t1", "boom again").await.unwrap();
        assert_eq!(outcome2, crate::domain::job_state::JobState::Failed);
    }

    #[tokio::test]
    async fn test_mark_completed_sets_terminal_state() {
        let adapter = SqliteJobQueueAdapter::connect("sqlite::memory:", 3, 5).await.unwrap();
        seed_job(&adapter.pool, "t1", 3, "2026-01-01T00:00:00Z").await;
        adapter.dequeue_next().await.unwrap().unwrap();
        adapter.mark_completed("t1").await.unwrap();

        let status = adapter.job_status("t1").await.unwrap();
        assert_eq!(status.state, "completed");
    }

    #[tokio::test]
    async fn test_job_status_is_not_found_for_unknown_id() {
        let adapter = SqliteJobQueueAdapter::connect("sqlite::memory:", 3, 5).await.unwrap();
        let status = adapter.job_status("does-not-exist").await.unwrap();
        assert_eq!(status.state, "not-found");
    }

    #[tokio::test]
    async fn test_queue_stats_counts_each_state() {
        let adapter = SqliteJobQueueAdapter::connect("sqlite::memory:", 3, 5).await.unwrap();
        seed_job(&adapter.pool, "w1", 3, "2026-01-01T00:00:00Z").await;
        seed_job(&adapter.pool, "w2", 3, "2026-01-01T00:00:01Z").await;
        adapter.dequeue_next().await.unwrap().unwrap();

        let stats = adapter.queue_stats().await.unwrap();
        assert_eq!(stats.waiting, 1);
        assert_eq!(stats.active, 1);
    }

    #[tokio::test]
    async fn test_clean_queue_purges_only_old_terminal_jobs() {
        let adapter = SqliteJobQueueAdapter::connect("sqlite::memory:", 3, 5).await.unwrap();
        seed_job(&adapter.pool, "t1", 3, "2026-01-01T00:00:00Z").await;
        adapter.dequeue_next().await.unwrap().unwrap();
        adapter.mark_completed("t1").await.unwrap();

        let removed = adapter.clean_queue(0).await.unwrap();
        assert_eq!(removed, 1);
        let status = adapter.job_status("t1").await.unwrap();
        assert_eq!(status.state, "not-found");
    }

    #[tokio::test]
    async fn test_recover_stalled_reclaims_active_job_with_old_heartbeat() {
        let adapter = SqliteJobQueueAdapter::connect("sqlite::memory:", 3, 5).await.unwrap();
        seed_job(&adapter.pool, "t1", 3, "2026-01-01T00:00:00Z").await;
        adapter.dequeue_next().await.unwrap().unwrap();

        sqlx::query("UPDATE jobs SET heartbeat_at = '2000-01-01T00:00:00Z' WHERE id = 't1'").execute(&adapter.pool).await.unwrap();

        let recovered = adapter.recover_stalled(60).await.unwrap();
        assert_eq!(recovered, 1);
        let status = adapter.job_status("t1").await.unwrap();
        assert_eq!(status.state, "waiting");
    }
}
