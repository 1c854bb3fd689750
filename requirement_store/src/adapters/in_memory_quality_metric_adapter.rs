//! In-memory quality metric repository adapter.
//!
//! Suitable for unit tests in downstream crates that need a
//! `QualityMetricRepositoryPort` without a SQLite file.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial InMemoryQualityMetricAdapter implementation.

/// In-memory implementation of the QualityMetricRepositoryPort.
///
/// `save` implements the same create-or-overwrite semantics as
/// `SqliteQualityMetricAdapter::upsert_async`: at most one row per task id.
#[derive(hexser::HexAdapter)]
pub struct InMemoryQualityMetricAdapter {
    metrics: std::sync::Arc<parking_lot::Mutex<std::collections::HashMap<String, crate::domain::quality_metric::QualityMetric>>>,
}

impl InMemoryQualityMetricAdapter {
    pub fn new() -> Self {
        Self {
            metrics: std::sync::Arc::new(parking_lot::Mutex::new(std::collections::HashMap::new())),
        }
    }
}

impl std::default::Default for InMemoryQualityMetricAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl hexser::ports::Repository<crate::domain::quality_metric::QualityMetric> for InMemoryQualityMetricAdapter {
    fn save(&mut self, entity: crate::domain::quality_metric::QualityMetric) -> hexser::HexResult<()> {
        let mut metrics = self.metrics.lock();
        metrics.insert(entity.task_id.clone(), entity);
        std::result::Result::Ok(())
    }
}

impl hexser::ports::repository::QueryRepository<crate::domain::quality_metric::QualityMetric> for InMemoryQualityMetricAdapter {
    type Filter = crate::ports::quality_metric_repository_port::QualityMetricFilter;
    type SortKey = crate::ports::quality_metric_repository_port::QualityMetricSortKey;

    fn find_one(&self, filter: &Self::Filter) -> hexser::HexResult<std::option::Option<crate::domain::quality_metric::QualityMetric>> {
        let metrics = self.metrics.lock();
        let found = match filter {
            crate::ports::quality_metric_repository_port::QualityMetricFilter::ByTaskId(task_id) => metrics.get(task_id).cloned(),
            crate::ports::quality_metric_repository_port::QualityMetricFilter::All => metrics.values().next().cloned(),
        };
        std::result::Result::Ok(found)
    }

    fn find(
        &self,
        filter: &Self::Filter,
        _opts: hexser::ports::repository::FindOptions<Self::SortKey>,
    ) -> hexser::HexResult<std::vec::Vec<crate::domain::quality_metric::QualityMetric>> {
        let metrics = self.metrics.lock();
        let filtered: std::vec::Vec<crate::domain::quality_metric::QualityMetric> = match filter {
            crate::ports::quality_metric_repository_port::QualityMetricFilter::ByTaskId(task_id) => {
                metrics.get(task_id).cloned().into_iter().collect()
            }
            crate::ports::quality_metric_repository_port::QualityMetricFilter::All => metrics.values().cloned().collect(),
        };
        std::result::Result::Ok(filtered)
    }
}

impl crate::ports::quality_metric_repository_port::QualityMetricRepositoryPort for InMemoryQualityMetricAdapter {}
