//! Implementation of the 'reqpipe submit' command.
//!
//! Creates a new requirement task and atomically enqueues its first job,
//! leaving the worker pool to pick it up and drive it through the
//! pipeline stages.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial submit command implementation.

fn parse_priority(value: &str) -> anyhow::Result<requirement_store::domain::priority::Priority> {
    match value.to_lowercase().as_str() {
        "low" => std::result::Result::Ok(requirement_store::domain::priority::Priority::Low),
        "medium" => std::result::Result::Ok(requirement_store::domain::priority::Priority::Medium),
        "high" => std::result::Result::Ok(requirement_store::domain::priority::Priority::High),
        "critical" => std::result::Result::Ok(requirement_store::domain::priority::Priority::Critical),
        other => std::result::Result::Err(anyhow::anyhow!(
            "Invalid priority: '{}'. Valid values: low, medium, high, critical",
            other
        )),
    }
}

pub async fn execute(
    requirement_text: &str,
    repository_url: &str,
    branch: &str,
    project_id: &str,
    priority: &str,
    language: &str,
    additional_context: std::option::Option<&str>,
    output_path: std::option::Option<&str>,
    template_id: std::option::Option<&str>,
) -> anyhow::Result<()> {
    if requirement_text.trim().is_empty() {
        anyhow::bail!("Requirement text must not be empty.");
    }

    let db_url = crate::commands::database_url()?;
    let adapter = requirement_store::adapters::sqlite_task_adapter::SqliteTaskAdapter::connect_and_init(&db_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;

    let priority = parse_priority(priority)?;
    let language = requirement_store::domain::language::Language::parse_or_default(language);

    let task = requirement_store::domain::task::Task::new(
        project_id.to_string(),
        repository_url.to_string(),
        branch.to_string(),
        requirement_text.to_string(),
        priority,
        additional_context.map(std::string::String::from),
        language,
        output_path.map(std::string::String::from),
    );
    let task_id = task.id.clone();

    adapter
        .create_task_and_enqueue_async(task)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create task: {:?}", e))?;

    if let std::option::Option::Some(template_id) = template_id {
        println!("Submitted task {} (templateId={}, not interpreted)", task_id, template_id);
    } else {
        println!("Submitted task {}", task_id);
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
    async fn test_submit_rejects_blank_requirement_text() {
        unsafe {
            std::env::set_var("DATABASE_URL", temp_db_url());
        }
        let result = execute(
            "   ",
            "git@example.com:org/repo.git",
            "main",
            "proj-1",
            "medium",
            "typescript",
            std::option::Option::None,
            std::option::Option::None,
            std::option::Option::None,
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_submit_rejects_invalid_priority() {
        unsafe {
            std::env::set_var("DATABASE_URL", temp_db_url());
        }
        let result = execute(
            "Build a thing",
            "git@example.com:org/repo.git",
            "main",
            "proj-1",
            "urgent",
            "typescript",
            std::option::Option::None,
            std::option::Option::None,
            std::option::Option::None,
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_submit_creates_task_in_fresh_database() {
        unsafe {
            std::env::set_var("DATABASE_URL", temp_db_url());
        }
        let result = execute(
            "Build a login form",
            "git@example.com:org/repo.git",
            "main",
            "proj-1",
            "high",
            "typescript",
            std::option::Option::Some("extra context"),
            std::option::Option::None,
            std::option::Option::None,
        )
        .await;
        assert!(result.is_ok());
    }
}
