//! SQLite-backed requirement task repository adapter.
//!
//! Implements HEXSER Repository and QueryRepository traits over a SQLite
//! database using `sqlx`. It adheres to the project's standards:
//! - No `use` statements (fully qualified paths only)
//! - One logical item per file (struct with inherent impls and trait impls)
//! - File-level docs and in-file tests
//! - No `unsafe`
//!
//! This adapter also owns the `jobs` table schema so that
//! `create_task_and_enqueue_async` can insert the task row and its job row
//! inside one transaction ("either both commit or
//! neither does"). `job_queue` connects to the same database file and reads
//! the same table; it never creates a job row itself.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial SqliteTaskAdapter with atomic create_task_and_enqueue_async.

/// SQLite-backed implementation of the requirement task repository ports.
#[derive(hexser::HexAdapter)]
pub struct SqliteTaskAdapter {
    pool: sqlx::Pool<sqlx::Sqlite>,
}

impl SqliteTaskAdapter {
    /// Creates a new adapter from an existing SQLite pool.
    pub fn new(pool: sqlx::Pool<sqlx::Sqlite>) -> Self {
        SqliteTaskAdapter { pool }
    }

    /// Returns a reference to the underlying SQLite pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Sqlite> {
        &self.pool
    }

    /// Connects to the provided database URL and ensures the schema exists.
    pub async fn connect_and_init(database_url: &str) -> std::result::Result<Self, std::string::String> {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .map_err(|e| std::format!("Failed to connect SQLite: {:?}", e))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS requirement_tasks (
                id TEXT PRIMARY KEY,
                project_id TEXT NOT NULL,
                repository_url TEXT NOT NULL,
                branch TEXT NOT NULL,
                requirement_text TEXT NOT NULL,
                priority TEXT NOT NULL,
                additional_context TEXT NULL,
                language TEXT NOT NULL,
                output_path TEXT NULL,
                status TEXT NOT NULL,
                progress REAL NOT NULL,
                details_json TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .map_err(|e| std::format!("Failed to create requirement_tasks schema: {:?}", e))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS jobs (
                id TEXT PRIMARY KEY,
                task_id TEXT NOT NULL,
                priority INTEGER NOT NULL,
                attempts INTEGER NOT NULL DEFAULT 0,
                last_error TEXT NULL,
                state TEXT NOT NULL,
                heartbeat_at TEXT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .map_err(|e| std::format!("Failed to create jobs schema: {:?}", e))?;

        std::result::Result::Ok(SqliteTaskAdapter { pool })
    }

    pub(crate) fn block_on<T>(fut: impl std::future::Future<Output = T>) -> T {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("failed to build tokio runtime");
        rt.block_on(fut)
    }

    /// Inserts the task row and its `waiting` job row inside one transaction,
    /// with `jobId == taskId`. If a non-terminal job already exists for this
    /// task id, the existing job id is returned without inserting a
    /// duplicate row or job.
    pub async fn create_task_and_enqueue_async(
        &self,
        task: crate::domain::task::Task,
    ) -> hexser::HexResult<String> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            let msg = std::format!("sqlx error: {:?}", e);
            hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::connection_failed("SQLite", msg.as_str()))
        })?;

        let existing_state: std::option::Option<String> = sqlx::query_scalar("SELECT state FROM jobs WHERE id = ?1")
            .bind(&task.id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                let msg = std::format!("sqlx error: {:?}", e);
                hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::connection_failed("SQLite", msg.as_str()))
            })?;

        if let std::option::Option::Some(state) = existing_state {
            if state != "completed" && state != "failed" {
                tx.rollback().await.ok();
                return std::result::Result::Ok(task.id);
            }
        }

        let details_json = serde_json::to_string(&task.details).map_err(|e| {
            hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::mapping_failure(
                std::format!("Failed to serialize details to JSON: {:?}", e).as_str(),
            ))
        })?;
        let priority_str = serde_json::to_string(&task.priority).map_err(|e| {
            hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::mapping_failure(
                std::format!("Failed to serialize priority to JSON: {:?}", e).as_str(),
            ))
        })?;
        let language_str = serde_json::to_string(&task.language).map_err(|e| {
            hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::mapping_failure(
                std::format!("Failed to serialize language to JSON: {:?}", e).as_str(),
            ))
        })?;
        let status_str = serde_json::to_string(&task.status).map_err(|e| {
            hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::mapping_failure(
                std::format!("Failed to serialize status to JSON: {:?}", e).as_str(),
            ))
        })?;
        let created_at = task.created_at.to_rfc3339();
        let updated_at = task.updated_at.to_rfc3339();

        sqlx::query(
            "INSERT INTO requirement_tasks (id, project_id, repository_url, branch, requirement_text, priority, additional_context, language, output_path, status, progress, details_json, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        )
        .bind(&task.id)
        .bind(&task.project_id)
        .bind(&task.repository_url)
        .bind(&task.branch)
        .bind(&task.requirement_text)
        .bind(&priority_str)
        .bind(&task.additional_context)
        .bind(&language_str)
        .bind(&task.output_path)
        .bind(&status_str)
        .bind(task.progress)
        .bind(&details_json)
        .bind(&created_at)
        .bind(&updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            let msg = std::format!("sqlx error: {:?}", e);
            hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::connection_failed("SQLite", msg.as_str()))
        })?;

        sqlx::query(
            "INSERT INTO jobs (id, task_id, priority, attempts, last_error, state, heartbeat_at, created_at, updated_at)
             VALUES (?1, ?1, ?2, 0, NULL, 'waiting', NULL, ?3, ?3)",
        )
        .bind(&task.id)
        .bind(task.priority.queue_weight())
        .bind(&created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            let msg = std::format!("sqlx error: {:?}", e);
            hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::connection_failed("SQLite", msg.as_str()))
        })?;

        tx.commit().await.map_err(|e| {
            let msg = std::format!("sqlx error: {:?}", e);
            hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::connection_failed("SQLite", msg.as_str()))
        })?;

        std::result::Result::Ok(task.id)
    }

    pub async fn save_async(&self, entity: crate::domain::task::Task) -> hexser::HexResult<()> {
        let details_json = serde_json::to_string(&entity.details).map_err(|e| {
            hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::mapping_failure(
                std::format!("Failed to serialize details to JSON: {:?}", e).as_str(),
            ))
        })?;
        let priority_str = serde_json::to_string(&entity.priority).map_err(|e| {
            hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::mapping_failure(
                std::format!("Failed to serialize priority to JSON: {:?}", e).as_str(),
            ))
        })?;
        let language_str = serde_json::to_string(&entity.language).map_err(|e| {
            hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::mapping_failure(
                std::format!("Failed to serialize language to JSON: {:?}", e).as_str(),
            ))
        })?;
        let status_str = serde_json::to_string(&entity.status).map_err(|e| {
            hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::mapping_failure(
                std::format!("Failed to serialize status to JSON: {:?}", e).as_str(),
            ))
        })?;
        let updated_at = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO requirement_tasks (id, project_id, repository_url, branch, requirement_text, priority, additional_context, language, output_path, status, progress, details_json, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
             ON CONFLICT(id) DO UPDATE SET
               project_id=excluded.project_id, repository_url=excluded.repository_url, branch=excluded.branch,
               requirement_text=excluded.requirement_text, priority=excluded.priority, additional_context=excluded.additional_context,
               language=excluded.language, output_path=excluded.output_path, status=excluded.status, progress=excluded.progress,
               details_json=excluded.details_json, updated_at=excluded.updated_at",
        )
        .bind(&entity.id)
        .bind(&entity.project_id)
        .bind(&entity.repository_url)
        .bind(&entity.branch)
        .bind(&entity.requirement_text)
        .bind(&priority_str)
        .bind(&entity.additional_context)
        .bind(&language_str)
        .bind(&entity.output_path)
        .bind(&status_str)
        .bind(entity.progress)
        .bind(&details_json)
        .bind(entity.created_at.to_rfc3339())
        .bind(&updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = std::format!("sqlx error: {:?}", e);
            hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::connection_failed("SQLite", msg.as_str()))
        })?;
        std::result::Result::Ok(())
    }

    const SELECT_COLUMNS: &'static str = "id, project_id, repository_url, branch, requirement_text, priority, additional_context, language, output_path, status, progress, details_json, created_at, updated_at";

    pub async fn find_one_async(
        &self,
        filter: &crate::ports::task_repository_port::TaskFilter,
    ) -> hexser::HexResult<std::option::Option<crate::domain::task::Task>> {
        let rows = self.find_async(filter, hexser::ports::repository::FindOptions { sort: std::option::Option::None, limit: std::option::Option::Some(1), offset: std::option::Option::None }).await?;
        std::result::Result::Ok(rows.into_iter().next())
    }

    pub async fn find_async(
        &self,
        filter: &crate::ports::task_repository_port::TaskFilter,
        opts: hexser::ports::repository::FindOptions<crate::ports::task_repository_port::TaskSortKey>,
    ) -> hexser::HexResult<std::vec::Vec<crate::domain::task::Task>> {
        let mut sql = std::format!("SELECT {} FROM requirement_tasks", Self::SELECT_COLUMNS);
        match filter {
            crate::ports::task_repository_port::TaskFilter::ById(_) => sql.push_str(" WHERE id = ?1"),
            crate::ports::task_repository_port::TaskFilter::ByProjectId(_) => sql.push_str(" WHERE project_id = ?1"),
            crate::ports::task_repository_port::TaskFilter::ByStatus(_) => sql.push_str(" WHERE status = ?1"),
            crate::ports::task_repository_port::TaskFilter::All => {}
        }

        if let std::option::Option::Some(sort_specs) = &opts.sort {
            let mut parts: std::vec::Vec<String> = std::vec::Vec::new();
            for s in sort_specs.iter() {
                let col = match &s.key {
                    crate::ports::task_repository_port::TaskSortKey::CreatedAt => "created_at",
                    crate::ports::task_repository_port::TaskSortKey::UpdatedAt => "updated_at",
                    crate::ports::task_repository_port::TaskSortKey::Priority => "priority",
                };
                let dir = if s.direction == hexser::ports::repository::Direction::Desc { "DESC" } else { "ASC" };
                parts.push(std::format!("{} {}", col, dir));
            }
            if !parts.is_empty() {
                sql.push_str(" ORDER BY ");
                sql.push_str(parts.join(", ").as_str());
            }
        }
        if let std::option::Option::Some(limit) = opts.limit {
            sql.push_str(std::format!(" LIMIT {}", limit).as_str());
        }
        if let std::option::Option::Some(offset) = opts.offset {
            sql.push_str(std::format!(" OFFSET {}", offset).as_str());
        }

        let rows: std::vec::Vec<sqlx::sqlite::SqliteRow> = match filter {
            crate::ports::task_repository_port::TaskFilter::ById(id) => {
                sqlx::query(sql.as_str()).bind(id).fetch_all(&self.pool).await
            }
            crate::ports::task_repository_port::TaskFilter::ByProjectId(project_id) => {
                sqlx::query(sql.as_str()).bind(project_id).fetch_all(&self.pool).await
            }
            crate::ports::task_repository_port::TaskFilter::ByStatus(status) => {
                let status_str = serde_json::to_string(status).map_err(|e| {
                    hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::mapping_failure(std::format!("serde error: {:?}", e).as_str()))
                })?;
                sqlx::query(sql.as_str()).bind(status_str).fetch_all(&self.pool).await
            }
            crate::ports::task_repository_port::TaskFilter::All => sqlx::query(sql.as_str()).fetch_all(&self.pool).await,
        }
        .map_err(|e| {
            let msg = std::format!("sqlx error: {:?}", e);
            hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::connection_failed("SQLite", msg.as_str()))
        })?;

        let mut out: std::vec::Vec<crate::domain::task::Task> = std::vec::Vec::new();
        for row in rows.iter() {
            out.push(Self::row_to_task(row)?);
        }
        std::result::Result::Ok(out)
    }

    fn row_to_task(row: &sqlx::sqlite::SqliteRow) -> hexser::HexResult<crate::domain::task::Task> {
        let id: String = sqlx::Row::get(row, 0);
        let project_id: String = sqlx::Row::get(row, 1);
        let repository_url: String = sqlx::Row::get(row, 2);
        let branch: String = sqlx::Row::get(row, 3);
        let requirement_text: String = sqlx::Row::get(row, 4);
        let priority_str: String = sqlx::Row::get(row, 5);
        let priority: crate::domain::priority::Priority = serde_json::from_str(priority_str.as_str()).map_err(|e| {
            hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::mapping_failure(std::format!("serde error: {:?}", e).as_str()))
        })?;
        let additional_context: std::option::Option<String> = sqlx::Row::get(row, 6);
        let language_str: String = sqlx::Row::get(row, 7);
        let language: crate::domain::language::Language = serde_json::from_str(language_str.as_str()).map_err(|e| {
            hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::mapping_failure(std::format!("serde error: {:?}", e).as_str()))
        })?;
        let output_path: std::option::Option<String> = sqlx::Row::get(row, 8);
        let status_str: String = sqlx::Row::get(row, 9);
        let status: crate::domain::task_status::TaskStatus = serde_json::from_str(status_str.as_str()).map_err(|e| {
            hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::mapping_failure(std::format!("serde error: {:?}", e).as_str()))
        })?;
        let progress: f64 = sqlx::Row::get(row, 10);
        let details_json: String = sqlx::Row::get(row, 11);
        let details: crate::domain::task_details::TaskDetails = serde_json::from_str(details_json.as_str()).map_err(|e| {
            hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::mapping_failure(std::format!("serde error: {:?}", e).as_str()))
        })?;
        let created_at_str: String = sqlx::Row::get(row, 12);
        let created_at = chrono::DateTime::parse_from_rfc3339(created_at_str.as_str())
            .map_err(|e| hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::mapping_failure(std::format!("time parse: {:?}", e).as_str())))?
            .with_timezone(&chrono::Utc);
        let updated_at_str: String = sqlx::Row::get(row, 13);
        let updated_at = chrono::DateTime::parse_from_rfc3339(updated_at_str.as_str())
            .map_err(|e| hexser::error::hex_error::Hexserror::Adapter(hexser::error::adapter_error::mapping_failure(std::format!("time parse: {:?}", e).as_str())))?
            .with_timezone(&chrono::Utc);

        std::result::Result::Ok(crate::domain::task::Task {
            id,
            project_id,
            repository_url,
            branch,
            requirement_text,
            priority,
            additional_context,
            language,
            output_path,
            status,
            progress,
            details,
            created_at,
            updated_at,
        })
    }
}

impl hexser::ports::Repository<crate::domain::task::Task> for SqliteTaskAdapter {
    fn save(&mut self, entity: crate::domain::task::Task) -> hexser::HexResult<()> {
        SqliteTaskAdapter::block_on(self.save_async(entity))
    }
}

impl hexser::ports::repository::QueryRepository<crate::domain::task::Task> for SqliteTaskAdapter {
    type Filter = crate::ports::task_repository_port::TaskFilter;
    type SortKey = crate::ports::task_repository_port::TaskSortKey;

    fn find_one(&self, filter: &Self::Filter) -> hexser::HexResult<std::option::Option<crate::domain::task::Task>> {
        SqliteTaskAdapter::block_on(self.find_one_async(filter))
    }

    fn find(
        &self,
        filter: &Self::Filter,
        opts: hexser::ports::repository::FindOptions<Self::SortKey>,
    ) -> hexser::HexResult<std::vec::Vec<crate::domain::task::Task>> {
        SqliteTaskAdapter::block_on(self.find_async(filter, opts))
    }
}

impl crate::ports::task_repository_port::TaskRepositoryPort for SqliteTaskAdapter {}
