//! Defines the Task domain entity for requirement submissions.
//!
//! Task represents the persisted, mutable entity that tracks a single
//! natural-language requirement through analysis, generation, quality
//! checking, and commit.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial Task struct with status-transition guard and progress monotonicity.

/// A durable record of one requirement submission with all pipeline state.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, hexser::HexEntity)]
pub struct Task {
    /// Unique identifier for this task (UUID v4).
    pub id: String,

    /// Caller-supplied project identifier.
    pub project_id: String,

    /// Remote Git repository URL the Committer pushes to.
    pub repository_url: String,

    /// Target branch for the main commit.
    pub branch: String,

    /// Original requirement text as submitted.
    pub requirement_text: String,

    /// Scheduling priority; also the queue's dequeue weight input.
    pub priority: crate::domain::priority::Priority,

    /// Optional free-form additional context supplied by the caller.
    pub additional_context: std::option::Option<String>,

    /// Target language for the Generator and Quality Checker.
    pub language: crate::domain::language::Language,

    /// Optional output sub-path within the repository; overrides the
    /// Generator's derived default when present.
    pub output_path: std::option::Option<String>,

    /// Current lifecycle status; authoritative over `progress`.
    pub status: crate::domain::task_status::TaskStatus,

    /// Advisory progress in [0.0, 1.0].
    pub progress: f64,

    /// Structured diagnostics accumulated across stages.
    pub details: crate::domain::task_details::TaskDetails,

    /// UTC timestamp when this task was created.
    pub created_at: chrono::DateTime<chrono::Utc>,

    /// UTC timestamp of the last modification to this task.
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Task {
    /// Creates a new task in the `pending` state with zero progress and a
    /// freshly generated id.
    pub fn new(
        project_id: String,
        repository_url: String,
        branch: String,
        requirement_text: String,
        priority: crate::domain::priority::Priority,
        additional_context: std::option::Option<String>,
        language: crate::domain::language::Language,
        output_path: std::option::Option<String>,
    ) -> Self {
        let now = chrono::Utc::now();
        Task {
            id: uuid::Uuid::new_v4().to_string(),
            project_id,
            repository_url,
            branch,
            requirement_text,
            priority,
            additional_context,
            language,
            output_path,
            status: crate::domain::task_status::TaskStatus::Pending,
            progress: 0.0,
            details: crate::domain::task_details::TaskDetails::empty(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a status transition, enforcing the legal-transition guard
    /// and the progress invariant: monotone non-decreasing until terminal,
    /// reset to 0 on failure.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Conflict` if the transition is not permitted.
    ///
    /// # Examples
    ///
    /// ```
    /// # use requirement_store::domain::task::Task;
    /// # use requirement_store::domain::task_status::TaskStatus;
    /// # use requirement_store::domain::priority::Priority;
    /// # use requirement_store::domain::language::Language;
    /// let mut task = Task::new(
    ///     "p1".to_string(), "git@host:o/r.git".to_string(), "main".to_string(),
    ///     "do the thing".to_string(), Priority::Medium, None, Language::TypeScript, None,
    /// );
    /// task.transition(TaskStatus::InProgress, 0.1, task.details.clone()).unwrap();
    /// assert_eq!(task.status, TaskStatus::InProgress);
    /// assert_eq!(task.progress, 0.1);
    /// ```
    pub fn transition(
        &mut self,
        next: crate::domain::task_status::TaskStatus,
        progress: f64,
        details: crate::domain::task_details::TaskDetails,
    ) -> std::result::Result<(), pipeline_core::PipelineError> {
        if !self.status.can_transition_to(next) {
            return std::result::Result::Err(pipeline_core::PipelineError::conflict(std::format!(
                "illegal status transition {:?} -> {:?}",
                self.status,
                next
            )));
        }

        self.progress = if next == crate::domain::task_status::TaskStatus::Failed {
            0.0
        } else {
            progress.max(self.progress)
        };
        self.status = next;
        self.details = details;
        self.updated_at = chrono::Utc::now();
        std::result::Result::Ok(())
    }
}
