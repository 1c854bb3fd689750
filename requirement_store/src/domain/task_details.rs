//! Defines the TaskDetails structured diagnostics object.
//!
//! TaskDetails records the most recent stage message and stage-specific
//! payload for a Task. It accumulates fields as a task
//! advances through the pipeline rather than being replaced wholesale by
//! every stage, so a completed task's details still show the analysis model
//! used, the quality verdict, and the commit result together.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial TaskDetails with per-stage accumulation fields.

/// One comparison-branch commit result from multi-model Generator mode.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
pub struct ComparisonBranch {
    pub provider_id: String,
    pub branch: String,
    pub commit_hash: String,
    pub files_changed: std::vec::Vec<String>,
}

/// Structured diagnostics accumulated across pipeline stages for one task.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
pub struct TaskDetails {
    /// Name of the stage most recently executed, e.g. "analysis", "code_commit".
    pub stage: std::option::Option<String>,
    /// Free-text message describing the most recent stage outcome.
    pub message: std::option::Option<String>,
    /// Populated only on failure; the concise error message.
    pub error: std::option::Option<String>,
    /// Provider id that produced the recorded analysis.
    pub analysis_model: std::option::Option<String>,
    /// Raw Analysis record, stored as JSON for forward-compatible diagnostics.
    pub analysis: std::option::Option<serde_json::Value>,
    /// Commit hash of the main-branch push; non-empty iff status is completed.
    pub commit_hash: std::option::Option<String>,
    /// Paths written and committed on the main branch.
    pub files_changed: std::vec::Vec<String>,
    /// Outcome of the quality gate, independent of whether commit was attempted.
    pub quality_passed: std::option::Option<bool>,
    /// Sub-scores recorded at the most recent quality check.
    pub quality_scores: std::option::Option<serde_json::Value>,
    /// Additional branches pushed during multi-model comparison mode.
    pub comparison_branches: std::vec::Vec<ComparisonBranch>,
}

impl TaskDetails {
    /// Details for the initial `pending` state: no prior stage.
    pub fn empty() -> Self {
        TaskDetails::default()
    }

    /// Marks this details object as a failure at the given stage, setting
    /// `error` to a concise message.
    pub fn with_failure(mut self, stage: impl std::fmt::Display, error: impl std::fmt::Display) -> Self {
        self.stage = std::option::Option::Some(stage.to_string());
        self.error = std::option::Option::Some(error.to_string());
        self
    }
}
