//! Defines the ManageRequirementTaskUseCase for task lifecycle operations.
//!
//! Wraps the HEXSER repository ports with the exact operation names of
//! `createTask` (here `create_task`), `updateStatus`,
//! `upsertMetrics`, `getTask`, `listTasks`, `getMetricsByTask`.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial ManageRequirementTaskUseCase implementation.

/// Use case for requirement task lifecycle and metric operations.
///
/// Generic over the concrete adapter types so callers can substitute the
/// in-memory adapters in tests and the SQLite adapters in production,
/// matching the HEXSER pattern used throughout this workspace.
pub struct ManageRequirementTaskUseCase<T, M>
where
    T: crate::ports::task_repository_port::TaskRepositoryPort,
    M: crate::ports::quality_metric_repository_port::QualityMetricRepositoryPort,
{
    task_repo: T,
    metric_repo: M,
}

impl<T, M> ManageRequirementTaskUseCase<T, M>
where
    T: crate::ports::task_repository_port::TaskRepositoryPort,
    M: crate::ports::quality_metric_repository_port::QualityMetricRepositoryPort,
{
    pub fn new(task_repo: T, metric_repo: M) -> Self {
        ManageRequirementTaskUseCase { task_repo, metric_repo }
    }

    /// Persists a task that has already been assigned an id, via the
    /// repository's `save`. Callers that need the atomic create+enqueue
    /// transaction should use
    /// `SqliteTaskAdapter::create_task_and_enqueue_async` directly; this
    /// method exists for adapters (like the in-memory one) with no queue
    /// counterpart to keep atomic with.
    pub fn create_task(&mut self, task: crate::domain::task::Task) -> std::result::Result<String, pipeline_core::PipelineError> {
        let id = task.id.clone();
        self.task_repo
            .save(task)
            .map_err(|e| pipeline_core::PipelineError::unknown(std::format!("{:?}", e)))?;
        std::result::Result::Ok(id)
    }

    /// Updates status, progress, and details on a single row. Rejects
    /// illegal transitions.
    pub fn update_status(
        &mut self,
        task_id: &str,
        new_status: crate::domain::task_status::TaskStatus,
        progress: f64,
        details: crate::domain::task_details::TaskDetails,
    ) -> std::result::Result<(), pipeline_core::PipelineError> {
        let mut task = self
            .task_repo
            .find_one(&crate::ports::task_repository_port::TaskFilter::ById(task_id.to_string()))
            .map_err(|e| pipeline_core::PipelineError::unknown(std::format!("{:?}", e)))?
            .ok_or_else(|| pipeline_core::PipelineError::not_found(std::format!("task {} not found", task_id)))?;

        task.transition(new_status, progress, details)?;

        self.task_repo
            .save(task)
            .map_err(|e| pipeline_core::PipelineError::unknown(std::format!("{:?}", e)))?;
        std::result::Result::Ok(())
    }

    /// Creates a row if none exists for the task, otherwise overwrites
    /// scores/payload/feedback on the existing row.
    pub fn upsert_metrics(&mut self, metric: crate::domain::quality_metric::QualityMetric) -> std::result::Result<(), pipeline_core::PipelineError> {
        self.metric_repo
            .save(metric)
            .map_err(|e| pipeline_core::PipelineError::unknown(std::format!("{:?}", e)))
    }

    /// Retrieves a task by id.
    pub fn get_task(&self, task_id: &str) -> std::result::Result<std::option::Option<crate::domain::task::Task>, pipeline_core::PipelineError> {
        self.task_repo
            .find_one(&crate::ports::task_repository_port::TaskFilter::ById(task_id.to_string()))
            .map_err(|e| pipeline_core::PipelineError::unknown(std::format!("{:?}", e)))
    }

    /// Lists tasks matching the given filter.
    pub fn list_tasks(
        &self,
        filter: crate::ports::task_repository_port::TaskFilter,
    ) -> std::result::Result<std::vec::Vec<crate::domain::task::Task>, pipeline_core::PipelineError> {
        self.task_repo
            .find(&filter, hexser::ports::repository::FindOptions::default())
            .map_err(|e| pipeline_core::PipelineError::unknown(std::format!("{:?}", e)))
    }

    /// Retrieves quality metric rows for a task.
    pub fn get_metrics_by_task(&self, task_id: &str) -> std::result::Result<std::vec::Vec<crate::domain::quality_metric::QualityMetric>, pipeline_core::PipelineError> {
        self.metric_repo
            .find(
                &crate::ports::quality_metric_repository_port::QualityMetricFilter::ByTaskId(task_id.to_string()),
                hexser::ports::repository::FindOptions::default(),
            )
            .map_err(|e| pipeline_core::PipelineError::unknown(std::format!("{:?}", e)))
    }
}
