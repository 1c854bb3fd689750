//! Command modules for the requirement pipeline CLI.
//!
//! Defines the CLI structure using clap's derive API and organizes
//! subcommands into separate modules for maintainability, mirroring the
//! way the upstream Rigger CLI splits one module per subcommand.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial command structure for the requirement pipeline CLI.

pub mod list;
pub mod queue_clean;
pub mod queue_stats;
pub mod status;
pub mod submit;

/// Command-line interface for submitting and tracking requirement tasks.
#[derive(clap::Parser)]
#[command(name = "reqpipe")]
#[command(about = "Requirement Processing Pipeline - submit and track requirement tasks", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as clap::Parser>::parse()
    }
}

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Submit a new natural-language requirement for processing
    Submit {
        /// The requirement text to process
        requirement_text: String,

        /// Target Git repository URL the Committer pushes to
        #[arg(long)]
        repository_url: String,

        /// Target branch for the main commit
        #[arg(long, default_value = "main")]
        branch: String,

        /// Caller-supplied project identifier
        #[arg(long)]
        project_id: String,

        /// Scheduling priority (low, medium, high, critical)
        #[arg(long, default_value = "medium")]
        priority: String,

        /// Target language for the Generator and Quality Checker
        #[arg(long, default_value = "typescript")]
        language: String,

        /// Optional free-form additional context
        #[arg(long)]
        additional_context: std::option::Option<String>,

        /// Optional output sub-path within the repository
        #[arg(long)]
        output_path: std::option::Option<String>,

        /// Opaque template identifier, threaded through unchanged
        #[arg(long)]
        template_id: std::option::Option<String>,
    },

    /// Show the current status, progress, and details of one task
    Status {
        /// Task ID to look up
        task_id: String,
    },

    /// List tasks with optional filtering and sorting
    List {
        /// Filter by caller-supplied project identifier
        #[arg(long)]
        project_id: std::option::Option<String>,

        /// Filter by status (pending, in_progress, completed, failed)
        #[arg(long)]
        status: std::option::Option<String>,

        /// Sort by field (created_at, updated_at, priority)
        #[arg(long, default_value = "created_at")]
        sort: String,

        /// Limit number of results
        #[arg(long)]
        limit: Option<u32>,

        /// Offset for pagination
        #[arg(long)]
        offset: Option<u64>,
    },

    /// Print aggregate per-state counts across the job queue
    QueueStats,

    /// Delete terminal (completed/failed) jobs older than a grace period
    QueueClean {
        /// Grace period in seconds; jobs older than this are removed
        #[arg(long, default_value = "86400")]
        grace_secs: i64,
    },
}

/// Resolves the database URL from the environment, matching
/// `PipelineConfig::from_env`'s `DATABASE_URL` variable without requiring
/// the rest of the pipeline configuration (LLM providers, Git identity)
/// that bookkeeping commands never touch.
pub fn database_url() -> anyhow::Result<std::string::String> {
    std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL is required. Set it to a sqlite:// connection string."))
}
