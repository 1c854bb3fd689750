//! Defines the TaskRepositoryPort output port for task persistence.
//!
//! Extends the HEXSER Repository/QueryRepository traits to provide the
//! atomic operations demanded by `createTask` (which
//! also enqueues a job in the same transaction, see
//! `create_task_and_enqueue_async` on the SQLite adapter), `updateStatus`,
//! `getTask`, and `listTasks`.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial TaskRepositoryPort trait definition.

/// Filter criteria for querying requirement tasks.
#[derive(Debug, Clone)]
pub enum TaskFilter {
    ById(String),
    ByProjectId(String),
    ByStatus(crate::domain::task_status::TaskStatus),
    All,
}

/// Sort key options for task queries.
#[derive(Debug, Clone)]
pub enum TaskSortKey {
    CreatedAt,
    UpdatedAt,
    Priority,
}

/// Port (interface) for requirement task persistence and retrieval.
pub trait TaskRepositoryPort:
    hexser::ports::Repository<crate::domain::task::Task>
    + hexser::ports::repository::QueryRepository<
        crate::domain::task::Task,
        Filter = TaskFilter,
        SortKey = TaskSortKey,
    >
    + Send
    + Sync
{
    // Marker trait - all methods provided by HEXSER Repository traits.
}
