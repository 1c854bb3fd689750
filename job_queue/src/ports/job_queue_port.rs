//! Contract a priority job queue backend must satisfy. Kept independent of
//! `hexser`'s `Repository`/`QueryRepository` traits: a queue is not a
//! plain CRUD store (dequeue mutates state as a side effect of reading),
//! so a bespoke port fits better here than forcing the generic shape.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial JobQueuePort definition.

#[async_trait::async_trait]
pub trait JobQueuePort: std::marker::Send + std::marker::Sync {
    /// Claims the highest-priority waiting job (lowest `priority` value
    /// first, oldest `created_at` breaking ties), marking it `active` and
    /// stamping a fresh heartbeat. Returns `None` when nothing is waiting.
    async fn dequeue_next(&self) -> std::result::Result<std::option::Option<crate::domain::job::Job>, pipeline_core::PipelineError>;

    /// Refreshes the heartbeat on an active job so stalled-job detection
    /// does not reclaim it mid-processing.
    async fn heartbeat(&self, job_id: &str) -> std::result::Result<(), pipeline_core::PipelineError>;

    /// Marks a job completed.
    async fn mark_completed(&self, job_id: &str) -> std::result::Result<(), pipeline_core::PipelineError>;

    /// Records a failed attempt. Transitions to `delayed` (with an
    /// exponential backoff before it becomes eligible again) if attempts
    /// remain, otherwise to `failed`.
    async fn mark_failed(&self, job_id: &str, error_message: &str) -> std::result::Result<crate::domain::job_state::JobState, pipeline_core::PipelineError>;

    /// Moves any `delayed` job whose backoff has elapsed back to `waiting`.
    async fn promote_ready_delayed(&self) -> std::result::Result<u64, pipeline_core::PipelineError>;

    /// Reclaims `active` jobs whose heartbeat is older than `stale_after`
    /// seconds back to `waiting`, so a crashed worker does not strand them.
    async fn recover_stalled(&self, stale_after_secs: i64) -> std::result::Result<u64, pipeline_core::PipelineError>;

    /// Returns `{state, progress}` for a job id, or the synthetic
    /// `not-found` state when the id is unknown.
    async fn job_status(&self, job_id: &str) -> std::result::Result<crate::domain::queue_stats::JobStatusView, pipeline_core::PipelineError>;

    /// Returns per-state counts across the whole queue.
    async fn queue_stats(&self) -> std::result::Result<crate::domain::queue_stats::QueueStats, pipeline_core::PipelineError>;

    /// Deletes terminal (`completed`/`failed`) jobs older than `grace_secs`.
    /// Returns the number of rows removed.
    async fn clean_queue(&self, grace_secs: i64) -> std::result::Result<u64, pipeline_core::PipelineError>;
}
