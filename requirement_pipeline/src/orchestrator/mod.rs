//! Orchestration state machine: drives one task through analysis,
//! generation, quality checking, and commit, recording a fixed
//! state/progress table at every step.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial Orchestrator driving the pipeline stages via injected ports.

/// Wires the task/metric store, the LLM caller, and the committer behind
/// one `run_task` entry point that the job queue's `WorkerPool` drives.
///
/// `ManageRequirementTaskUseCase::update_status`/`upsert_metrics` take
/// `&mut self`, but `WorkerPool::process_available`'s processor closure is
/// `Fn(Job) -> Future`, invoked concurrently across spawned tasks up to the
/// configured concurrency bound. Wrapping the use case in
/// `Arc<tokio::sync::Mutex<..>>` makes that serialization explicit at the
/// type level, mirroring how the SQLite adapters already serialize writes
/// through their single connection.
pub struct Orchestrator<T, M>
where
    T: requirement_store::ports::task_repository_port::TaskRepositoryPort,
    M: requirement_store::ports::quality_metric_repository_port::QualityMetricRepositoryPort,
{
    tasks: std::sync::Arc<tokio::sync::Mutex<requirement_store::use_cases::manage_requirement_task::ManageRequirementTaskUseCase<T, M>>>,
    llm: std::sync::Arc<dyn crate::ports::llm_caller_port::LlmCallerPort>,
    committer: std::sync::Arc<dyn crate::ports::committer_port::CommitterPort>,
    quality_gate_enabled: bool,
}

impl<T, M> std::clone::Clone for Orchestrator<T, M>
where
    T: requirement_store::ports::task_repository_port::TaskRepositoryPort,
    M: requirement_store::ports::quality_metric_repository_port::QualityMetricRepositoryPort,
{
    fn clone(&self) -> Self {
        Orchestrator {
            tasks: self.tasks.clone(),
            llm: self.llm.clone(),
            committer: self.committer.clone(),
            quality_gate_enabled: self.quality_gate_enabled,
        }
    }
}

impl<T, M> Orchestrator<T, M>
where
    T: requirement_store::ports::task_repository_port::TaskRepositoryPort + 'static,
    M: requirement_store::ports::quality_metric_repository_port::QualityMetricRepositoryPort + 'static,
{
    pub fn new(
        task_repo: T,
        metric_repo: M,
        llm: std::sync::Arc<dyn crate::ports::llm_caller_port::LlmCallerPort>,
        committer: std::sync::Arc<dyn crate::ports::committer_port::CommitterPort>,
        quality_gate_enabled: bool,
    ) -> Self {
        Orchestrator {
            tasks: std::sync::Arc::new(tokio::sync::Mutex::new(requirement_store::use_cases::manage_requirement_task::ManageRequirementTaskUseCase::new(task_repo, metric_repo))),
            llm,
            committer,
            quality_gate_enabled,
        }
    }

    async fn advance(&self, task_id: &str, status: requirement_store::domain::task_status::TaskStatus, progress: f64, details: requirement_store::domain::task_details::TaskDetails) -> std::result::Result<(), pipeline_core::PipelineError> {
        let mut tasks = self.tasks.lock().await;
        tasks.update_status(task_id, status, progress, details)
    }

    /// Runs the full pipeline for one task, recording each state/progress
    /// row as it advances. Returns `Err` only for
    /// bookkeeping failures (task lookup/status-update errors); stage
    /// failures (analyzer, generator, committer) are caught and recorded
    /// as a `failed` status instead of propagating, since the job queue's
    /// retry policy should not re-run a task whose requirement text the
    /// LLM could never satisfy without caller intervention.
    pub async fn run_task(&self, task_id: &str) -> std::result::Result<(), pipeline_core::PipelineError> {
        let task = {
            let tasks = self.tasks.lock().await;
            tasks.get_task(task_id)?.ok_or_else(|| pipeline_core::PipelineError::not_found(std::format!("task {} not found", task_id)))?
        };

        if let std::result::Result::Err(failure) = self.run_stages(task_id, &task).await {
            let details = requirement_store::domain::task_details::TaskDetails::empty().with_failure(failure.stage, failure.error);
            self.advance(task_id, requirement_store::domain::task_status::TaskStatus::Failed, 0.0, details).await?;
        }

        std::result::Result::Ok(())
    }

    async fn run_stages(&self, task_id: &str, task: &requirement_store::domain::task::Task) -> std::result::Result<(), StageFailure> {
        self.advance(task_id, requirement_store::domain::task_status::TaskStatus::InProgress, 0.1, requirement_store::domain::task_details::TaskDetails { stage: std::option::Option::Some("analyzing".to_string()), ..std::default::Default::default() })
            .await
            .map_err(|e| StageFailure::new("analysis", e))?;

        let (analysis, analysis_model) = crate::analyzer::analyze(
            self.llm.as_ref(),
            &task.requirement_text,
            task.language,
            task.additional_context.as_deref(),
            std::option::Option::None,
            std::option::Option::None,
        )
        .await
        .map_err(|e| StageFailure::new("analysis", e))?;

        let analysis_json = serde_json::to_value(&analysis).unwrap_or(serde_json::Value::Null);
        self.advance(
            task_id,
            requirement_store::domain::task_status::TaskStatus::InProgress,
            0.3,
            requirement_store::domain::task_details::TaskDetails {
                stage: std::option::Option::Some("analyzed".to_string()),
                analysis_model: std::option::Option::Some(analysis_model),
                analysis: std::option::Option::Some(analysis_json.clone()),
                ..std::default::Default::default()
            },
        )
        .await
        .map_err(|e| StageFailure::new("code_generation", e))?;

        let generation = crate::generator::generate(
            self.llm.as_ref(),
            &analysis,
            &task.requirement_text,
            task.language,
            task.additional_context.as_deref(),
            std::option::Option::None,
        )
        .await
        .map_err(|e| StageFailure::new("code_generation", e))?;

        self.advance(
            task_id,
            requirement_store::domain::task_status::TaskStatus::InProgress,
            0.5,
            requirement_store::domain::task_details::TaskDetails {
                stage: std::option::Option::Some("generated".to_string()),
                analysis: std::option::Option::Some(analysis_json.clone()),
                ..std::default::Default::default()
            },
        )
        .await
        .map_err(|e| StageFailure::new("quality_check", e))?;

        let metric = crate::quality::check_quality(self.llm.as_ref(), task_id, &generation.artifact, &analysis, task.language, std::option::Option::None)
            .await
            .map_err(|e| StageFailure::new("quality_check", e))?;
        let quality_passed = metric.passed();
        let quality_scores = serde_json::json!({
            "codeQuality": metric.code_quality_score,
            "requirementCoverage": metric.requirement_coverage_score,
            "syntaxValidity": metric.syntax_validity_score,
            "aggregate": metric.aggregate(),
        });

        {
            let mut tasks = self.tasks.lock().await;
            tasks.upsert_metrics(metric).map_err(|e| StageFailure::new("quality_check", e))?;
        }

        self.advance(
            task_id,
            requirement_store::domain::task_status::TaskStatus::InProgress,
            0.7,
            requirement_store::domain::task_details::TaskDetails {
                stage: std::option::Option::Some("quality-checked".to_string()),
                analysis: std::option::Option::Some(analysis_json.clone()),
                quality_passed: std::option::Option::Some(quality_passed),
                quality_scores: std::option::Option::Some(quality_scores.clone()),
                ..std::default::Default::default()
            },
        )
        .await
        .map_err(|e| StageFailure::new("code_commit", e))?;

        if self.quality_gate_enabled && !quality_passed {
            return std::result::Result::Err(StageFailure::from_message("quality_gate", "Low code quality score"));
        }

        self.advance(
            task_id,
            requirement_store::domain::task_status::TaskStatus::InProgress,
            0.8,
            requirement_store::domain::task_details::TaskDetails {
                stage: std::option::Option::Some("committing".to_string()),
                analysis: std::option::Option::Some(analysis_json.clone()),
                quality_passed: std::option::Option::Some(quality_passed),
                quality_scores: std::option::Option::Some(quality_scores.clone()),
                ..std::default::Default::default()
            },
        )
        .await
        .map_err(|e| StageFailure::new("code_commit", e))?;

        let output_path = task.output_path.clone().unwrap_or(generation.output_path);
        let commit_request = crate::ports::committer_port::CommitRequest {
            repository_url: task.repository_url.clone(),
            branch: task.branch.clone(),
            output_path,
            artifact: generation.artifact,
            commit_title: analysis.title.clone(),
            commit_body: task.requirement_text.clone(),
        };
        let commit_outcome = self.committer.commit_artifact(commit_request).await.map_err(|e| StageFailure::new("code_commit", e))?;

        self.advance(
            task_id,
            requirement_store::domain::task_status::TaskStatus::Completed,
            1.0,
            requirement_store::domain::task_details::TaskDetails {
                stage: std::option::Option::Some("completed".to_string()),
                analysis: std::option::Option::Some(analysis_json),
                commit_hash: std::option::Option::Some(commit_outcome.commit_hash),
                files_changed: commit_outcome.files_changed,
                quality_passed: std::option::Option::Some(quality_passed),
                quality_scores: std::option::Option::Some(quality_scores),
                ..std::default::Default::default()
            },
        )
        .await
        .map_err(|e| StageFailure::new("code_commit", e))?;

        std::result::Result::Ok(())
    }
}

struct StageFailure {
    stage: &'static str,
    error: std::string::String,
}

impl StageFailure {
    fn new(stage: &'static str, error: pipeline_core::PipelineError) -> Self {
        StageFailure { stage, error: error.to_string() }
    }

    /// Builds a failure from a literal message, bypassing `PipelineError`'s
    /// `Display` so the persisted `details.error` is not prefixed with a
    /// category like "conflict: ".
    fn from_message(stage: &'static str, message: &str) -> Self {
        StageFailure { stage, error: message.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedLlm {
        responses: std::sync::Mutex<std::collections::VecDeque<std::string::String>>,
    }

    impl ScriptedLlm {
        fn new(responses: std::vec::Vec<&str>) -> Self {
            ScriptedLlm { responses: std::sync::Mutex::new(responses.into_iter().map(|s| s.to_string()).collect()) }
        }
    }

    #[async_trait::async_trait]
    impl crate::ports::llm_caller_port::LlmCallerPort for ScriptedLlm {
        async fn generate(
            &self,
            _prompt: &str,
            _system: std::option::Option<&str>,
            _preferred_provider: std::option::Option<&str>,
            _options: &llm_registry::domain::call_options::CallOptions,
        ) -> std::result::Result<llm_registry::domain::call_outcome::CallOutcome, pipeline_core::PipelineError> {
            let mut responses = self.responses.lock().expect("lock poisoned");
            let text = responses.pop_front().expect("scripted response available");
            std::result::Result::Ok(llm_registry::domain::call_outcome::CallOutcome::new("ollama-generate".to_string(), text))
        }

        async fn generate_many(
            &self,
            _prompt: &str,
            _system: std::option::Option<&str>,
            _provider_ids: &[std::string::String],
            _options: &llm_registry::domain::call_options::CallOptions,
        ) -> std::vec::Vec<(std::string::String, std::result::Result<llm_registry::domain::call_outcome::CallOutcome, pipeline_core::PipelineError>)> {
            std::vec::Vec::new()
        }
    }

    struct FakeCommitter {
        result: std::sync::Mutex<std::option::Option<std::result::Result<crate::ports::committer_port::CommitOutcome, std::string::String>>>,
        called: std::sync::atomic::AtomicBool,
    }

    #[async_trait::async_trait]
    impl crate::ports::committer_port::CommitterPort for FakeCommitter {
        async fn commit_artifact(&self, _request: crate::ports::committer_port::CommitRequest) -> std::result::Result<crate::ports::committer_port::CommitOutcome, pipeline_core::PipelineError> {
            self.called.store(true, std::sync::atomic::Ordering::SeqCst);
            match self.result.lock().expect("lock poisoned").take() {
                std::option::Option::Some(std::result::Result::Ok(outcome)) => std::result::Result::Ok(outcome),
                std::option::Option::Some(std::result::Result::Err(message)) => std::result::Result::Err(pipeline_core::PipelineError::provider_retryable("git-push", message)),
                std::option::Option::None => std::result::Result::Err(pipeline_core::PipelineError::unknown("commit called twice")),
            }
        }
    }

    fn sample_task() -> requirement_store::domain::task::Task {
        requirement_store::domain::task::Task::new(
            "p1".to_string(),
            "git@host:o/r.git".to_string(),
            "main".to_string(),
            "Build a todo API".to_string(),
            requirement_store::domain::priority::Priority::Medium,
            std::option::Option::None,
            requirement_store::domain::language::Language::TypeScript,
            std::option::Option::None,
        )
    }

    fn new_orchestrator(llm: ScriptedLlm, committer: FakeCommitter, quality_gate_enabled: bool) -> Orchestrator<requirement_store::adapters::in_memory_task_adapter::InMemoryTaskAdapter, requirement_store::adapters::in_memory_quality_metric_adapter::InMemoryQualityMetricAdapter> {
        Orchestrator::new(
            requirement_store::adapters::in_memory_task_adapter::InMemoryTaskAdapter::new(),
            requirement_store::adapters::in_memory_quality_metric_adapter::InMemoryQualityMetricAdapter::new(),
            std::sync::Arc::new(llm),
            std::sync::Arc::new(committer),
            quality_gate_enabled,
        )
    }

    #[tokio::test]
    async fn test_happy_path_completes_and_commits() {
        let llm = ScriptedLlm::new(std::vec![
            r#"{"title":"Todo API","functionality":"CRUD for todos","components":["TodoController"],"inputsOutputs":"REST JSON","dependencies":"none","fileStructure":["src/todo.controller.ts"]}"#,
            r#"{"src/todo.controller.ts": "export class TodoController {}"}"#,
            "valid",
            r#"{"totalScore": 92, "scores": {"correctness": 95, "completeness": 90, "codeQuality": 92, "errorHandling": 88, "security": 90}, "feedback": "solid", "issues": []}"#,
            r#"{"coverageScore": 95, "reason": "covers all components"}"#,
        ]);
        let committer = FakeCommitter {
            result: std::sync::Mutex::new(std::option::Option::Some(std::result::Result::Ok(crate::ports::committer_port::CommitOutcome { commit_hash: "abc123".to_string(), files_changed: std::vec!["src/todo.controller.ts".to_string()] }))),
            called: std::sync::atomic::AtomicBool::new(false),
        };
        let orchestrator = new_orchestrator(llm, committer, false);

        let task_id = {
            let mut tasks = orchestrator.tasks.lock().await;
            tasks.create_task(sample_task()).unwrap()
        };

        orchestrator.run_task(&task_id).await.unwrap();

        let tasks = orchestrator.tasks.lock().await;
        let task = tasks.get_task(&task_id).unwrap().unwrap();
        assert_eq!(task.status, requirement_store::domain::task_status::TaskStatus::Completed);
        assert_eq!(task.progress, 1.0);
        assert_eq!(task.details.commit_hash.as_deref(), Some("abc123"));
        assert_eq!(task.details.quality_passed, Some(true));
    }

    #[tokio::test]
    async fn test_quality_gate_failure_skips_commit_when_enabled() {
        let llm = ScriptedLlm::new(std::vec![
            r#"{"title":"Todo API","functionality":"CRUD for todos","components":[],"inputsOutputs":"","dependencies":"","fileStructure":["src/todo.controller.ts"]}"#,
            r#"{"src/todo.controller.ts": "export class TodoController {}"}"#,
            "invalid",
            r#"{"totalScore": 40, "scores": {"correctness": 40, "completeness": 50, "codeQuality": 40, "errorHandling": 30, "security": 30}, "feedback": "needs work", "issues": ["no error handling"]}"#,
            r#"{"coverageScore": 50, "reason": "partial"}"#,
        ]);
        let committer = FakeCommitter {
            result: std::sync::Mutex::new(std::option::Option::Some(std::result::Result::Ok(crate::ports::committer_port::CommitOutcome { commit_hash: "should-not-happen".to_string(), files_changed: std::vec::Vec::new() }))),
            called: std::sync::atomic::AtomicBool::new(false),
        };
        let orchestrator = new_orchestrator(llm, committer, true);

        let task_id = {
            let mut tasks = orchestrator.tasks.lock().await;
            tasks.create_task(sample_task()).unwrap()
        };

        orchestrator.run_task(&task_id).await.unwrap();

        let tasks = orchestrator.tasks.lock().await;
        let task = tasks.get_task(&task_id).unwrap().unwrap();
        assert_eq!(task.status, requirement_store::domain::task_status::TaskStatus::Failed);
        assert_eq!(task.details.error.as_deref(), Some("Low code quality score"));
        assert_eq!(task.details.stage.as_deref(), Some("quality_gate"));
    }

    #[tokio::test]
    async fn test_quality_gate_failure_still_commits_when_gate_disabled() {
        let llm = ScriptedLlm::new(std::vec![
            r#"{"title":"Todo API","functionality":"CRUD for todos","components":[],"inputsOutputs":"","dependencies":"","fileStructure":["src/todo.controller.ts"]}"#,
            r#"{"src/todo.controller.ts": "export class TodoController {}"}"#,
            "invalid",
            r#"{"totalScore": 40, "scores": {"correctness": 40, "completeness": 50, "codeQuality": 40, "errorHandling": 30, "security": 30}, "feedback": "needs work", "issues": []}"#,
            r#"{"coverageScore": 50, "reason": "partial"}"#,
        ]);
        let committer = FakeCommitter {
            result: std::sync::Mutex::new(std::option::Option::Some(std::result::Result::Ok(crate::ports::committer_port::CommitOutcome { commit_hash: "def456".to_string(), files_changed: std::vec!["src/todo.controller.ts".to_string()] }))),
            called: std::sync::atomic::AtomicBool::new(false),
        };
        let orchestrator = new_orchestrator(llm, committer, false);

        let task_id = {
            let mut tasks = orchestrator.tasks.lock().await;
            tasks.create_task(sample_task()).unwrap()
        };

        orchestrator.run_task(&task_id).await.unwrap();

        let tasks = orchestrator.tasks.lock().await;
        let task = tasks.get_task(&task_id).unwrap().unwrap();
        assert_eq!(task.status, requirement_store::domain::task_status::TaskStatus::Completed);
        assert_eq!(task.details.quality_passed, Some(false));
        assert_eq!(task.details.commit_hash.as_deref(), Some("def456"));
    }

    #[tokio::test]
    async fn test_commit_failure_is_recorded_as_failed_at_code_commit_stage() {
        let llm = ScriptedLlm::new(std::vec![
            r#"{"title":"Todo API","functionality":"CRUD for todos","components":[],"inputsOutputs":"","dependencies":"","fileStructure":["src/todo.controller.ts"]}"#,
            r#"{"src/todo.controller.ts": "export class TodoController {}"}"#,
            "valid",
            r#"{"totalScore": 92, "scores": {"correctness": 95, "completeness": 90, "codeQuality": 92, "errorHandling": 88, "security": 90}, "feedback": "solid", "issues": []}"#,
            r#"{"coverageScore": 95, "reason": "covers all components"}"#,
        ]);
        let committer = FakeCommitter {
            result: std::sync::Mutex::new(std::option::Option::Some(std::result::Result::Err("push rejected: non-fast-forward".to_string()))),
            called: std::sync::atomic::AtomicBool::new(false),
        };
        let orchestrator = new_orchestrator(llm, committer, false);

        let task_id = {
            let mut tasks = orchestrator.tasks.lock().await;
            tasks.create_task(sample_task()).unwrap()
        };

        orchestrator.run_task(&task_id).await.unwrap();

        let tasks = orchestrator.tasks.lock().await;
        let task = tasks.get_task(&task_id).unwrap().unwrap();
        assert_eq!(task.status, requirement_store::domain::task_status::TaskStatus::Failed);
        assert_eq!(task.details.stage.as_deref(), Some("code_commit"));
        assert!(task.details.error.as_ref().unwrap().contains("push rejected"));
    }

    #[tokio::test]
    async fn test_empty_analysis_still_proceeds_through_generation() {
        let llm = ScriptedLlm::new(std::vec![
            "I cannot analyze this.",
            r#"{"index.ts": "export const x = 1;"}"#,
            "valid",
            r#"{"totalScore": 60, "scores": {"correctness": 60, "completeness": 60, "codeQuality": 60, "errorHandling": 60, "security": 60}, "feedback": "minimal", "issues": []}"#,
            r#"{"coverageScore": 60, "reason": "best effort"}"#,
        ]);
        let committer = FakeCommitter {
            result: std::sync::Mutex::new(std::option::Option::Some(std::result::Result::Ok(crate::ports::committer_port::CommitOutcome { commit_hash: "ghi789".to_string(), files_changed: std::vec!["index.ts".to_string()] }))),
            called: std::sync::atomic::AtomicBool::new(false),
        };
        let orchestrator = new_orchestrator(llm, committer, false);

        let task_id = {
            let mut tasks = orchestrator.tasks.lock().await;
            tasks.create_task(sample_task()).unwrap()
        };

        orchestrator.run_task(&task_id).await.unwrap();

        let tasks = orchestrator.tasks.lock().await;
        let task = tasks.get_task(&task_id).unwrap().unwrap();
        assert_eq!(task.status, requirement_store::domain::task_status::TaskStatus::Completed);
    }
}
