//! Implementation of the 'reqpipe status' command.
//!
//! Looks up one task by id and prints its current status, progress, and
//! accumulated stage details.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial status command implementation.

pub async fn execute(task_id: &str) -> anyhow::Result<()> {
    let db_url = crate::commands::database_url()?;
    let adapter = requirement_store::adapters::sqlite_task_adapter::SqliteTaskAdapter::connect_and_init(&db_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;

    let filter = requirement_store::ports::task_repository_port::TaskFilter::ById(task_id.to_string());
    let task = {
        use hexser::ports::repository::QueryRepository;
        adapter.find_one(&filter)
    }
    .map_err(|e| anyhow::anyhow!("Query failed: {:?}", e))?;

    let task = match task {
        std::option::Option::Some(t) => t,
        std::option::Option::None => {
            anyhow::bail!("Task not found: {}", task_id);
        }
    };

    println!("Task:       {}", task.id);
    println!("Project:    {}", task.project_id);
    println!("Status:     {:?}", task.status);
    println!("Progress:   {:.0}%", task.progress * 100.0);
    if let std::option::Option::Some(stage) = &task.details.stage {
        println!("Stage:      {}", stage);
    }
    if let std::option::Option::Some(message) = &task.details.message {
        println!("Message:    {}", message);
    }
    if let std::option::Option::Some(error) = &task.details.error {
        println!("Error:      {}", error);
    }
    if let std::option::Option::Some(commit_hash) = &task.details.commit_hash {
        println!("Commit:     {}", commit_hash);
    }
    if let std::option::Option::Some(quality_passed) = task.details.quality_passed {
        println!("Quality OK: {}", quality_passed);
    }

    let metrics = {
        let manager = requirement_store::use_cases::manage_requirement_task::ManageRequirementTaskUseCase::new(
            adapter,
            requirement_store::adapters::sqlite_quality_metric_adapter::SqliteQualityMetricAdapter::connect_and_init(&db_url)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?,
        );
        manager.get_metrics_by_task(task_id)
    }
    .map_err(|e| anyhow::anyhow!("Failed to load quality metrics: {:?}", e))?;

    for metric in metrics.iter() {
        println!(
            "Quality:    aggregate={:.1} code={:.1} coverage={:.1} syntax={:.1} passed={}",
            metric.aggregate(),
            metric.code_quality_score,
            metric.requirement_coverage_score,
            metric.syntax_validity_score,
            metric.passed()
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
    async fn test_status_fails_for_unknown_task() {
        unsafe {
            std::env::set_var("DATABASE_URL", temp_db_url());
        }
        let result = execute("nonexistent-task-id").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_status_succeeds_for_known_task() {
        let db_url = temp_db_url();
        unsafe {
            std::env::set_var("DATABASE_URL", &db_url);
        }

        let adapter = requirement_store::adapters::sqlite_task_adapter::SqliteTaskAdapter::connect_and_init(&db_url)
            .await
            .unwrap();
        let task = requirement_store::domain::task::Task::new(
            "proj-1".to_string(),
            "git@example.com:org/repo.git".to_string(),
            "main".to_string(),
            "Build a thing".to_string(),
            requirement_store::domain::priority::Priority::Medium,
            std::option::Option::None,
            requirement_store::domain::language::Language::TypeScript,
            std::option::Option::None,
        );
        let task_id = task.id.clone();
        adapter.create_task_and_enqueue_async(task).await.unwrap();

        let result = execute(&task_id).await;
        assert!(result.is_ok());
    }
}
