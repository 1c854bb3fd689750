//! Defines the TaskStatus enum for requirement task lifecycle states.
//!
//! TaskStatus is the authoritative field for pipeline progress: progress is
//! advisory, status is authoritative. Transitions are validated by
//! `can_transition_to` rather than left to callers to enforce by
//! convention.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial TaskStatus enum with transition guard.

/// Lifecycle status of a requirement task.
#[derive(Debug, Clone, Copy, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl TaskStatus {
    /// True if moving from `self` to `next` is a legal transition.
    ///
    /// Permitted: pending→in_progress; in_progress→in_progress (progress
    /// update); in_progress→completed; any→failed. Re-entry into
    /// `in_progress` from a terminal state is only permitted through an
    /// explicit re-queue operation, not through this guard.
    ///
    /// # Examples
    ///
    /// ```
    /// # use requirement_store::domain::task_status::TaskStatus;
    /// assert!(TaskStatus::Pending.can_transition_to(TaskStatus::InProgress));
    /// assert!(!TaskStatus::Completed.can_transition_to(TaskStatus::InProgress));
    /// assert!(TaskStatus::InProgress.can_transition_to(TaskStatus::Failed));
    /// ```
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        if next == TaskStatus::Failed {
            return true;
        }
        match (self, next) {
            (TaskStatus::Pending, TaskStatus::InProgress) => true,
            (TaskStatus::InProgress, TaskStatus::InProgress) => true,
            (TaskStatus::InProgress, TaskStatus::Completed) => true,
            _ => false,
        }
    }

    /// True once a task has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}
