//! Aggregate counts returned by `getQueueStats`.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial QueueStats definition.

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QueueStats {
    pub waiting: i64,
    pub active: i64,
    pub completed: i64,
    pub failed: i64,
    pub delayed: i64,
    pub as_of: chrono::DateTime<chrono::Utc>,
}

/// What `getJobStatus` returns for a known job id. Progress is sourced
/// from the task row sharing the job's id, when present.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct JobStatusView {
    pub state: std::string::String,
    pub progress: std::option::Option<f64>,
}

impl JobStatusView {
    pub fn not_found() -> Self {
        Self { state: "not-found".to_string(), progress: std::option::Option::None }
    }
}
