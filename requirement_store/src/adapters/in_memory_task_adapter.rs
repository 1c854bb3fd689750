//! In-memory requirement task repository adapter.
//!
//! Suitable for unit tests in downstream crates (`job_queue`,
//! `requirement_pipeline`) that need a `TaskRepositoryPort` without a SQLite
//! file. Not used in production; `SqliteTaskAdapter` is the durable adapter.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial InMemoryTaskAdapter implementation.

/// In-memory implementation of the TaskRepositoryPort.
#[derive(hexser::HexAdapter)]
pub struct InMemoryTaskAdapter {
    tasks: std::sync::Arc<parking_lot::Mutex<std::collections::HashMap<String, crate::domain::task::Task>>>,
}

impl InMemoryTaskAdapter {
    pub fn new() -> Self {
        Self {
            tasks: std::sync::Arc::new(parking_lot::Mutex::new(std::collections::HashMap::new())),
        }
    }
}

impl std::default::Default for InMemoryTaskAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl hexser::ports::Repository<crate::domain::task::Task> for InMemoryTaskAdapter {
    fn save(&mut self, entity: crate::domain::task::Task) -> hexser::HexResult<()> {
        let mut tasks = self.tasks.lock();
        tasks.insert(entity.id.clone(), entity);
        std::result::Result::Ok(())
    }
}

impl hexser::ports::repository::QueryRepository<crate::domain::task::Task> for InMemoryTaskAdapter {
    type Filter = crate::ports::task_repository_port::TaskFilter;
    type SortKey = crate::ports::task_repository_port::TaskSortKey;

    fn find_one(&self, filter: &Self::Filter) -> hexser::HexResult<std::option::Option<crate::domain::task::Task>> {
        let tasks = self.tasks.lock();
        let found = match filter {
            crate::ports::task_repository_port::TaskFilter::ById(id) => tasks.get(id).cloned(),
            crate::ports::task_repository_port::TaskFilter::ByProjectId(project_id) => {
                tasks.values().find(|task| &task.project_id == project_id).cloned()
            }
            crate::ports::task_repository_port::TaskFilter::ByStatus(status) => {
                tasks.values().find(|task| &task.status == status).cloned()
            }
            crate::ports::task_repository_port::TaskFilter::All => tasks.values().next().cloned(),
        };
        std::result::Result::Ok(found)
    }

    fn find(
        &self,
        filter: &Self::Filter,
        opts: hexser::ports::repository::FindOptions<Self::SortKey>,
    ) -> hexser::HexResult<std::vec::Vec<crate::domain::task::Task>> {
        let tasks = self.tasks.lock();
        let mut filtered: std::vec::Vec<crate::domain::task::Task> = match filter {
            crate::ports::task_repository_port::TaskFilter::ById(id) => tasks.get(id).cloned().into_iter().collect(),
            crate::ports::task_repository_port::TaskFilter::ByProjectId(project_id) => {
                tasks.values().filter(|task| &task.project_id == project_id).cloned().collect()
            }
            crate::ports::task_repository_port::TaskFilter::ByStatus(status) => {
                tasks.values().filter(|task| &task.status == status).cloned().collect()
            }
            crate::ports::task_repository_port::TaskFilter::All => tasks.values().cloned().collect(),
        };

        if let std::option::Option::Some(sort_specs) = opts.sort {
            for sort_spec in sort_specs.iter().rev() {
                match &sort_spec.key {
                    crate::ports::task_repository_port::TaskSortKey::CreatedAt => filtered.sort_by_key(|task| task.created_at),
                    crate::ports::task_repository_port::TaskSortKey::UpdatedAt => filtered.sort_by_key(|task| task.updated_at),
                    crate::ports::task_repository_port::TaskSortKey::Priority => {
                        filtered.sort_by_key(|task| task.priority.queue_weight())
                    }
                }
                if sort_spec.direction == hexser::ports::repository::Direction::Desc {
                    filtered.reverse();
                }
            }
        }

        if let std::option::Option::Some(offset) = opts.offset {
            filtered = filtered.into_iter().skip(offset as usize).collect();
        }
        if let std::option::Option::Some(limit) = opts.limit {
            filtered = filtered.into_iter().take(limit as usize).collect();
        }

        std::result::Result::Ok(filtered)
    }
}

impl crate::ports::task_repository_port::TaskRepositoryPort for InMemoryTaskAdapter {}
