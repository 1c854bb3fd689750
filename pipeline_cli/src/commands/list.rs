//! Implementation of the 'reqpipe list' command.
//!
//! Lists requirement tasks from the SQLite database with optional
//! filtering by project id or status, and sorting.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial list command implementation.

pub async fn execute(
    project_id: std::option::Option<&str>,
    status: std::option::Option<&str>,
    sort: &str,
    limit: std::option::Option<u32>,
    offset: std::option::Option<u64>,
) -> anyhow::Result<()> {
    let db_url = crate::commands::database_url()?;
    let adapter = requirement_store::adapters::sqlite_task_adapter::SqliteTaskAdapter::connect_and_init(&db_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;

    let filter = if let std::option::Option::Some(status_str) = status {
        let task_status = match status_str.to_lowercase().as_str() {
            "pending" => requirement_store::domain::task_status::TaskStatus::Pending,
            "in_progress" | "inprogress" => requirement_store::domain::task_status::TaskStatus::InProgress,
            "completed" => requirement_store::domain::task_status::TaskStatus::Completed,
            "failed" => requirement_store::domain::task_status::TaskStatus::Failed,
            other => {
                anyhow::bail!(
                    "Invalid status: '{}'. Valid values: pending, in_progress, completed, failed",
                    other
                );
            }
        };
        requirement_store::ports::task_repository_port::TaskFilter::ByStatus(task_status)
    } else if let std::option::Option::Some(project_id) = project_id {
        requirement_store::ports::task_repository_port::TaskFilter::ByProjectId(project_id.to_string())
    } else {
        requirement_store::ports::task_repository_port::TaskFilter::All
    };

    let sort_key = match sort {
        "created_at" => requirement_store::ports::task_repository_port::TaskSortKey::CreatedAt,
        "updated_at" => requirement_store::ports::task_repository_port::TaskSortKey::UpdatedAt,
        "priority" => requirement_store::ports::task_repository_port::TaskSortKey::Priority,
        other => {
            anyhow::bail!(
                "Invalid sort field: '{}'. Valid values: created_at, updated_at, priority",
                other
            );
        }
    };

    let find_options = hexser::ports::repository::FindOptions {
        sort: std::option::Option::Some(std::vec![hexser::ports::repository::Sort {
            key: sort_key,
            direction: hexser::ports::repository::Direction::Desc,
        }]),
        limit,
        offset,
    };

    let tasks = {
        use hexser::ports::repository::QueryRepository;
        adapter.find(&filter, find_options)
    }
    .map_err(|e| anyhow::anyhow!("Query failed: {:?}", e))?;

    if tasks.is_empty() {
        println!("No tasks found.");
        return std::result::Result::Ok(());
    }

    println!("{:<38} {:<14} {:<12} {:<8} project", "id", "status", "priority", "progress");
    for task in tasks.iter() {
        println!(
            "{:<38} {:<14} {:<12} {:>6.0}%  {}",
            task.id,
            std::format!("{:?}", task.status),
            task.priority.to_string(),
            task.progress * 100.0,
            task.project_id
        );
    }

    std::result::Result::Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db_url() -> std::string::String {
        let path = std::env::temp_dir().join(std::format!("reqpipe_cli_test_{}.db", uuid::Uuid::new_v4()));
        std::format!("sqlite:{}", path.display())
    }

    #[tokio::test]
    async fn test_list_with_empty_database() {
        unsafe {
            std::env::set_var("DATABASE_URL", temp_db_url());
        }
        let result = execute(
            std::option::Option::None,
            std::option::Option::None,
            "created_at",
            std::option::Option::None,
            std::option::Option::None,
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_list_rejects_invalid_sort_field() {
        unsafe {
            std::env::set_var("DATABASE_URL", temp_db_url());
        }
        let result = execute(
            std::option::Option::None,
            std::option::Option::None,
            "not_a_real_field",
            std::option::Option::None,
            std::option::Option::None,
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_rejects_invalid_status() {
        unsafe {
            std::env::set_var("DATABASE_URL", temp_db_url());
        }
        let result = execute(
            std::option::Option::None,
            std::option::Option::Some("bogus"),
            "created_at",
            std::option::Option::None,
            std::option::Option::None,
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_filters_by_project_id() {
        let db_url = temp_db_url();
        unsafe {
            std::env::set_var("DATABASE_URL", &db_url);
        }

        let adapter = requirement_store::adapters::sqlite_task_adapter::SqliteTaskAdapter::connect_and_init(&db_url)
            .await
            .unwrap();
        let task = requirement_store::domain::task::Task::new(
            "proj-match".to_string(),
            "git@example.com:org/repo.git".to_string(),
            "main".to_string(),
            "Build a thing".to_string(),
            requirement_store::domain::priority::Priority::Low,
            std::option::Option::None,
            requirement_store::domain::language::Language::TypeScript,
            std::option::Option::None,
        );
        adapter.create_task_and_enqueue_async(task).await.unwrap();

        let result = execute(
            std::option::Option::Some("proj-match"),
            std::option::Option::None,
            "created_at",
            std::option::Option::None,
            std::option::Option::None,
        )
        .await;
        assert!(result.is_ok());
    }
}
