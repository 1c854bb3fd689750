//! Defines the CommitterPort trait so the Orchestrator can depend on a
//! trait object rather than the concrete `git2`-backed committer, matching
//! the injected-port pattern used throughout this workspace's use cases.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial CommitterPort trait and CommitRequest/CommitOutcome.

/// Everything the Committer needs to materialize and push one artifact.
#[derive(Debug, Clone)]
pub struct CommitRequest {
    pub repository_url: std::string::String,
    pub branch: std::string::String,
    pub output_path: std::string::String,
    pub artifact: std::collections::HashMap<std::string::String, std::string::String>,
    pub commit_title: std::string::String,
    pub commit_body: std::string::String,
}

/// Successful commit result: the pushed commit hash and the paths written.
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    pub commit_hash: std::string::String,
    pub files_changed: std::vec::Vec<std::string::String>,
}

#[async_trait::async_trait]
pub trait CommitterPort: Send + Sync {
    async fn commit_artifact(&self, request: CommitRequest) -> std::result::Result<CommitOutcome, pipeline_core::PipelineError>;
}
