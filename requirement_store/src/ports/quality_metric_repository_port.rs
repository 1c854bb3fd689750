//! Defines the QualityMetricRepositoryPort output port for metric persistence.
//!
//! Grounded on the append-only row shape used by
//! `task_orchestrator::adapters::sqlite_metrics_collector` in the upstream
//! pipeline this was adapted from, generalized to the three weighted
//! sub-scores of `QualityMetric`.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial QualityMetricRepositoryPort trait definition.

/// Filter criteria for querying quality metric rows.
#[derive(Debug, Clone)]
pub enum QualityMetricFilter {
    ByTaskId(String),
    All,
}

/// Sort key options for quality metric queries.
#[derive(Debug, Clone)]
pub enum QualityMetricSortKey {
    CreatedAt,
}

/// Port (interface) for quality metric persistence and retrieval.
pub trait QualityMetricRepositoryPort:
    hexser::ports::Repository<crate::domain::quality_metric::QualityMetric>
    + hexser::ports::repository::QueryRepository<
        crate::domain::quality_metric::QualityMetric,
        Filter = QualityMetricFilter,
        SortKey = QualityMetricSortKey,
    >
    + Send
    + Sync
{
    // Marker trait - all methods provided by HEXSER Repository traits.
}
