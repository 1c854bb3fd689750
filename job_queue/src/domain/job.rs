//! A queued unit of work. `id` equals the owning task's id, which is what
//! makes re-enqueueing the same task idempotent without a separate dedupe
//! table.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial Job entity.

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Job {
    pub id: std::string::String,
    pub priority: i64,
    pub attempts: u32,
    pub last_error: std::option::Option<std::string::String>,
    pub state: crate::domain::job_state::JobState,
    pub heartbeat_at: std::option::Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
