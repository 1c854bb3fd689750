//! Requirement Pipeline CLI - command-line interface for submitting and
//! tracking requirement tasks.
//!
//! This binary lets a caller submit natural-language requirements, check
//! task status and progress, list tasks, and inspect or clean the job
//! queue, without needing the HTTP handler layer.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial CLI structure with clap subcommands.

mod commands;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = commands::Cli::parse();

    match cli.command {
        commands::Commands::Submit {
            requirement_text,
            repository_url,
            branch,
            project_id,
            priority,
            language,
            additional_context,
            output_path,
            template_id,
        } => {
            commands::submit::execute(
                &requirement_text,
                &repository_url,
                &branch,
                &project_id,
                &priority,
                &language,
                additional_context.as_deref(),
                output_path.as_deref(),
                template_id.as_deref(),
            )
            .await?;
        }
        commands::Commands::Status { task_id } => {
            commands::status::execute(&task_id).await?;
        }
        commands::Commands::List { project_id, status, sort, limit, offset } => {
            commands::list::execute(project_id.as_deref(), status.as_deref(), &sort, limit, offset).await?;
        }
        commands::Commands::QueueStats => {
            commands::queue_stats::execute().await?;
        }
        commands::Commands::QueueClean { grace_secs } => {
            commands::queue_clean::execute(grace_secs).await?;
        }
    }

    std::result::Result::Ok(())
}
