//! SQLite-backed quality metric repository adapter.
//!
//! Quality Metric rows are append-only except for
//! `upsert_async`, which implements the Task Store's `upsertMetrics`
//! contract: create a row if none exists for the
//! task, otherwise overwrite scores/payload/feedback on the existing row.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial SqliteQualityMetricAdapter with upsert_async.

/// SQLite-backed implementation of the quality metric repository ports.
#[derive(hexser::HexAdapter)]
pub struct SqliteQualityMetricAdapter {
    pool: sqlx::Pool<sqlx::Sqlite>,
}

impl SqliteQualityMetricAdapter {
    pub fn new(pool: sqlx::Pool<sqlx::Sqlite>) -> Self {
        SqliteQualityMetricAdapter { pool }
    }

    pub fn pool(&self) -> &sqlx::Pool<sqlx::Sqlite> {
        &self.pool
    }

    pub async fn connect_and_init(database_url: &str) -> std::result::Result<Self, std::string::String> {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .map_err(|e| std::format!("Failed to connect SQLite: {:?}", e))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS quality_metrics (
                id TEXT PRIMARY KEY,
                task_id TEXT NOT NULL,
                code_quality_score REAL NOT NULL,
                requirement_coverage_score REAL NOT NULL,
                syntax_validity_score REAL NOT NULL,
                static_analysis_json TEXT NOT NULL,
                feedback TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .map_err(|e| std::format!("Failed to create quality_metrics schema: {:?}", e))?;

        std::result::Result::Ok(SqliteQualityMetricAdapter { pool })
    }

    fn block_on<T>(fut: impl std::future::Future<Output = T>) -> T {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("failed to build tokio runtime");
        rt.block_on(fut)
    }

    /// Creates a row if none exists for `metric.task_id`, otherwise
    /// overwrites scores/payload/feedback on the existing row.
    pub async fn upsert_async(&self, metric: crate::domain::quality_metric::QualityMetric) -> hexser::HexResult<()> {
        let static_analysis_json = serde_json::to_string(&metric.static_analysis).map_err(|e| {
            hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::mapping_failure(
                std::format!("Failed to serialize static_analysis to JSON: {:?}", e).as_str(),
            ))
        })?;

        let existing_id: std::option::Option<String> = sqlx::query_scalar("SELECT id FROM quality_metrics WHERE task_id = ?1")
            .bind(&metric.task_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                let msg = std::format!("sqlx error: {:?}", e);
                hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::connection_failed("SQLite", msg.as_str()))
            })?;

        let row_id = existing_id.unwrap_or_else(|| metric.id.clone());

        sqlx::query(
            "INSERT INTO quality_metrics (id, task_id, code_quality_score, requirement_coverage_score, syntax_validity_score, static_analysis_json, feedback, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
               code_quality_score=excluded.code_quality_score,
               requirement_coverage_score=excluded.requirement_coverage_score,
               syntax_validity_score=excluded.syntax_validity_score,
               static_analysis_json=excluded.static_analysis_json,
               feedback=excluded.feedback",
        )
        .bind(&row_id)
        .bind(&metric.task_id)
        .bind(metric.code_quality_score)
        .bind(metric.requirement_coverage_score)
        .bind(metric.syntax_validity_score)
        .bind(&static_analysis_json)
        .bind(&metric.feedback)
        .bind(metric.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = std::format!("sqlx error: {:?}", e);
            hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::connection_failed("SQLite", msg.as_str()))
        })?;

        std::result::Result::Ok(())
    }

    pub async fn save_async(&self, entity: crate::domain::quality_metric::QualityMetric) -> hexser::HexResult<()> {
        self.upsert_async(entity).await
    }

    const SELECT_COLUMNS: &'static str = "id, task_id, code_quality_score, requirement_coverage_score, syntax_validity_score, static_analysis_json, feedback, created_at";

    pub async fn find_one_async(
        &self,
        filter: &crate::ports::quality_metric_repository_port::QualityMetricFilter,
    ) -> hexser::HexResult<std::option::Option<crate::domain::quality_metric::QualityMetric>> {
        let rows = self
            .find_async(filter, hexser::ports::repository::FindOptions { sort: std::option::Option::None, limit: std::option::Option::Some(1), offset: std::option::Option::None })
            .await?;
        std::result::Result::Ok(rows.into_iter().next())
    }

    pub async fn find_async(
        &self,
        filter: &crate::ports::quality_metric_repository_port::QualityMetricFilter,
        opts: hexser::ports::repository::FindOptions<crate::ports::quality_metric_repository_port::QualityMetricSortKey>,
    ) -> hexser::HexResult<std::vec::Vec<crate::domain::quality_metric::QualityMetric>> {
        let mut sql = std::format!("SELECT {} FROM quality_metrics", Self::SELECT_COLUMNS);
        match filter {
            crate::ports::quality_metric_repository_port::QualityMetricFilter::ByTaskId(_) => sql.push_str(" WHERE task_id = ?1"),
            crate::ports::quality_metric_repository_port::QualityMetricFilter::All => {}
        }
        if opts.sort.is_some() {
            sql.push_str(" ORDER BY created_at ASC");
        }
        if let std::option::Option::Some(limit) = opts.limit {
            sql.push_str(std::format!(" LIMIT {}", limit).as_str());
        }
        if let std::option::Option::Some(offset) = opts.offset {
            sql.push_str(std::format!(" OFFSET {}", offset).as_str());
        }

        let rows: std::vec::Vec<sqlx::sqlite::SqliteRow> = match filter {
            crate::ports::quality_metric_repository_port::QualityMetricFilter::ByTaskId(task_id) => {
                sqlx::query(sql.as_str()).bind(task_id).fetch_all(&self.pool).await
            }
            crate::ports::quality_metric_repository_port::QualityMetricFilter::All => sqlx::query(sql.as_str()).fetch_all(&self.pool).await,
        }
        .map_err(|e| {
            let msg = std::format!("sqlx error: {:?}", e);
            hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::connection_failed("SQLite", msg.as_str()))
        })?;

        let mut out: std::vec::Vec<crate::domain::quality_metric::QualityMetric> = std::vec::Vec::new();
        for row in rows.iter() {
            out.push(Self::row_to_metric(row)?);
        }
        std::result::Result::Ok(out)
    }

    fn row_to_metric(row: &sqlx::sqlite::SqliteRow) -> hexser::HexResult<crate::domain::quality_metric::QualityMetric> {
        let id: String = sqlx::Row::get(row, 0);
        let task_id: String = sqlx::Row::get(row, 1);
        let code_quality_score: f64 = sqlx::Row::get(row, 2);
        let requirement_coverage_score: f64 = sqlx::Row::get(row, 3);
        let syntax_validity_score: f64 = sqlx::Row::get(row, 4);
        let static_analysis_json: String = sqlx::Row::get(row, 5);
        let static_analysis: serde_json::Value = serde_json::from_str(static_analysis_json.as_str()).map_err(|e| {
            hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::mapping_failure(std::format!("serde error: {:?}", e).as_str()))
        })?;
        let feedback: String = sqlx::Row::get(row, 6);
        let created_at_str: String = sqlx::Row::get(row, 7);
        let created_at = chrono::DateTime::parse_from_rfc3339(created_at_str.as_str())
            .map_err(|e| hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::mapping_failure(std::format!("time parse: {:?}", e).as_str())))?
            .with_timezone(&chrono::Utc);

        std::result::Result::Ok(crate::domain::quality_metric::QualityMetric {
            id,
            task_id,
            code_quality_score,
            requirement_coverage_score,
            syntax_validity_score,
            static_analysis,
            feedback,
            created_at,
        })
    }
}

impl hexser::ports::Repository<crate::domain::quality_metric::QualityMetric> for SqliteQualityMetricAdapter {
    fn save(&mut self, entity: crate::domain::quality_metric::QualityMetric) -> hexser::HexResult<()> {
        SqliteQualityMetricAdapter::block_on(self.save_async(entity))
    }
}

impl hexser::ports::repository::QueryRepository<crate::domain::quality_metric::QualityMetric> for SqliteQualityMetricAdapter {
    type Filter = crate::ports::quality_metric_repository_port::QualityMetricFilter;
    type SortKey = crate::ports::quality_metric_repository_port::QualityMetricSortKey;

    fn find_one(&self, filter: &Self::Filter) -> hexser::HexResult<std::option::Option<crate::domain::quality_metric::QualityMetric>> {
        SqliteQualityMetricAdapter::block_on(self.find_one_async(filter))
    }

    fn find(
        &self,
        filter: &Self::Filter,
        opts: hexser::ports::repository::FindOptions<Self::SortKey>,
    ) -> hexser::HexResult<std::vec::Vec<crate::domain::quality_metric::QualityMetric>> {
        SqliteQualityMetricAdapter::block_on(self.find_async(filter, opts))
    }
}

impl crate::ports::quality_metric_repository_port::QualityMetricRepositoryPort for SqliteQualityMetricAdapter {}

#[cfg(test)]
mod tests {
    #[tokio::test]
    async fn test_upsert_creates_row_when_none_exists() {
        let adapter = super::SqliteQualityMetricAdapter::connect_and_init("sqlite::memory:").await.unwrap();
        let metric = crate::domain::quality_metric::QualityMetric::new(
            std::string::String::from("t1"), 90.0, 80.0, 100.0, serde_json::json!({"correctness": 30}), std::string::String::from("solid"),
        );
        adapter.upsert_async(metric).await.unwrap();

        let found = adapter
            .find_one_async(&crate::ports::quality_metric_repository_port::QualityMetricFilter::ByTaskId(std::string::String::from("t1")))
            .await
            .unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().feedback, "solid");
    }

    #[tokio::test]
    async fn test_upsert_overwrites_existing_row_instead_of_duplicating() {
        let adapter = super::SqliteQualityMetricAdapter::connect_and_init("sqlite::memory:").await.unwrap();
        let first = crate::domain::quality_metric::QualityMetric::new(
            std::string::String::from("t1"), 40.0, 50.0, 60.0, serde_json::json!({}), std::string::String::from("first pass"),
        );
        adapter.upsert_async(first).await.unwrap();

        let second = crate::domain::quality_metric::QualityMetric::new(
            std::string::String::from("t1"), 90.0, 90.0, 90.0, serde_json::json!({}), std::string::String::from("second pass"),
        );
        adapter.upsert_async(second).await.unwrap();

        let rows = adapter
            .find_async(
                &crate::ports::quality_metric_repository_port::QualityMetricFilter::ByTaskId(std::string::String::from("t1")),
                hexser::ports::repository::FindOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].feedback, "second pass");
    }
}
