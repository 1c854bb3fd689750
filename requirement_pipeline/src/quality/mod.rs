//! Quality checking: the four-step algorithm that scores a generated
//! artifact against an Analysis and decides whether it passes the gate.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial four-step quality check implementation.

/// Per-file truncation applied before a file's content enters an evaluator
/// prompt, keeping the evaluator's context bounded.
const PER_FILE_PROMPT_CAP: usize = 1000;
/// Overall corpus truncation applied to the joined, per-file-capped code
/// before it enters the code-quality evaluator prompt.
const OVERALL_PROMPT_CAP: usize = 8000;
/// Weight of file-structure coverage inside the requirement-coverage score.
const FILE_STRUCTURE_COVERAGE_WEIGHT: f64 = 0.3;
/// Weight of functional coverage inside the requirement-coverage score.
const FUNCTIONAL_COVERAGE_WEIGHT: f64 = 0.7;
/// Low, near-deterministic temperature: evaluators are scoring, not composing.
const EVALUATION_TEMPERATURE: f64 = 0.1;

fn truncate_chars(text: &str, max_chars: usize) -> std::string::String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect::<std::string::String>() + "...[truncated]"
    }
}

/// Step 1: syntax validity. One validator call per code file (matched by
/// the language's known extension set); score is the valid fraction, or 0
/// if there are no code files at all.
async fn check_syntax_validity(
    llm: &dyn crate::ports::llm_caller_port::LlmCallerPort,
    artifact: &crate::generator::parsing::Artifact,
    language: requirement_store::domain::language::Language,
    preferred_provider: std::option::Option<&str>,
) -> std::result::Result<f64, pipeline_core::PipelineError> {
    let extensions = language.code_extensions();
    let code_files: std::vec::Vec<(&std::string::String, &std::string::String)> = artifact
        .iter()
        .filter(|(path, _)| extensions.iter().any(|ext| path.ends_with(&std::format!(".{}", ext))))
        .collect();

    if code_files.is_empty() {
        return std::result::Result::Ok(0.0);
    }

    let options = llm_registry::domain::call_options::CallOptions::new(EVALUATION_TEMPERATURE, std::option::Option::None);
    let mut valid_count: usize = 0;
    for (path, content) in code_files.iter() {
        let prompt_text = std::format!(
            "Is the following {} file syntactically valid? Respond with exactly one word: \"valid\" or \"invalid\".\n\nFile: {}\n\n{}",
            language.as_str(),
            path,
            truncate_chars(content, PER_FILE_PROMPT_CAP)
        );
        let outcome = llm
            .generate(&prompt_text, std::option::Option::None, preferred_provider, &options)
            .await?;
        if outcome.text.to_lowercase().contains("valid") && !outcome.text.to_lowercase().contains("invalid") {
            valid_count += 1;
        }
    }

    std::result::Result::Ok((valid_count as f64 / code_files.len() as f64) * 100.0)
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct CodeQualityScores {
    #[serde(default)]
    correctness: f64,
    #[serde(default)]
    completeness: f64,
    #[serde(default, rename = "codeQuality")]
    code_quality: f64,
    #[serde(default, rename = "errorHandling")]
    error_handling: f64,
    #[serde(default)]
    security: f64,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct CodeQualityEvaluation {
    #[serde(default, rename = "totalScore")]
    total_score: f64,
    #[serde(default)]
    scores: CodeQualityScores,
    #[serde(default)]
    feedback: std::string::String,
    #[serde(default)]
    issues: std::vec::Vec<std::string::String>,
}

fn extract_brace_block(raw: &str) -> std::option::Option<std::string::String> {
    let start_idx = raw.find('{')?;
    let end_idx = raw.rfind('}')?;
    if end_idx < start_idx {
        return std::option::Option::None;
    }
    std::option::Option::Some(raw[start_idx..=end_idx].to_string())
}

fn parse_code_quality_evaluation(raw: &str) -> CodeQualityEvaluation {
    if let std::result::Result::Ok(evaluation) = serde_json::from_str::<CodeQualityEvaluation>(raw.trim()) {
        return evaluation;
    }
    if let std::option::Option::Some(candidate) = extract_brace_block(raw) {
        if let std::result::Result::Ok(evaluation) = serde_json::from_str::<CodeQualityEvaluation>(&candidate) {
            return evaluation;
        }
    }
    CodeQualityEvaluation::default()
}

/// Step 2: holistic code quality, scored 0-100 against a five-category
/// rubric (30/25/25/10/10 weighting baked into the evaluator prompt).
async fn check_code_quality(
    llm: &dyn crate::ports::llm_caller_port::LlmCallerPort,
    artifact: &crate::generator::parsing::Artifact,
    analysis: &requirement_store::domain::analysis::Analysis,
    preferred_provider: std::option::Option<&str>,
) -> std::result::Result<(f64, serde_json::Value, std::string::String), pipeline_core::PipelineError> {
    let mut corpus = std::string::String::new();
    let mut sorted_paths: std::vec::Vec<&std::string::String> = artifact.keys().collect();
    sorted_paths.sort();
    for path in sorted_paths {
        corpus.push_str(&std::format!("# {}\n{}\n\n", path, truncate_chars(&artifact[path], PER_FILE_PROMPT_CAP)));
    }
    let corpus = truncate_chars(&corpus, OVERALL_PROMPT_CAP);

    let prompt_text = std::format!(
        "Evaluate the following generated code against the analysis below. Score each category 0-100: correctness (weight 30), completeness (weight 25), codeQuality (weight 25), errorHandling (weight 10), security (weight 10). Respond with a single JSON object: {{\"totalScore\": number, \"scores\": {{\"correctness\": number, \"completeness\": number, \"codeQuality\": number, \"errorHandling\": number, \"security\": number}}, \"feedback\": string, \"issues\": [string]}}.\n\n# Analysis\nTitle: {}\nFunctionality: {}\n\n# Code\n{}",
        analysis.title, analysis.functionality, corpus
    );

    let options = llm_registry::domain::call_options::CallOptions::new(EVALUATION_TEMPERATURE, std::option::Option::None);
    let outcome = llm
        .generate(&prompt_text, std::option::Option::None, preferred_provider, &options)
        .await?;

    let evaluation = parse_code_quality_evaluation(&outcome.text);
    let scores_json = serde_json::json!({
        "correctness": evaluation.scores.correctness,
        "completeness": evaluation.scores.completeness,
        "codeQuality": evaluation.scores.code_quality,
        "errorHandling": evaluation.scores.error_handling,
        "security": evaluation.scores.security,
        "issues": evaluation.issues,
    });
    std::result::Result::Ok((evaluation.total_score, scores_json, evaluation.feedback))
}

fn file_structure_coverage(analysis: &requirement_store::domain::analysis::Analysis, artifact: &crate::generator::parsing::Artifact) -> f64 {
    if analysis.file_structure.is_empty() {
        return 1.0;
    }

    let generated_names: std::vec::Vec<&str> = artifact.keys().map(|path| path.rsplit('/').next().unwrap_or(path)).collect();
    let matched = analysis
        .file_structure
        .iter()
        .filter(|required_path| {
            let required_name = required_path.rsplit('/').next().unwrap_or(required_path);
            generated_names.iter().any(|generated_name| {
                *generated_name == required_name
                    || generated_name.contains(required_name)
                    || required_name.contains(*generated_name)
            })
        })
        .count();

    matched as f64 / analysis.file_structure.len() as f64
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct FunctionalCoverageEvaluation {
    #[serde(default, rename = "coverageScore")]
    coverage_score: f64,
    #[serde(default)]
    reason: std::string::String,
}

fn parse_functional_coverage(raw: &str) -> FunctionalCoverageEvaluation {
    if let std::result::Result::Ok(evaluation) = serde_json::from_str::<FunctionalCoverageEvaluation>(raw.trim()) {
        return evaluation;
    }
    if let std::option::Option::Some(candidate) = extract_brace_block(raw) {
        if let std::result::Result::Ok(evaluation) = serde_json::from_str::<FunctionalCoverageEvaluation>(&candidate) {
            return evaluation;
        }
    }
    FunctionalCoverageEvaluation::default()
}

async fn functional_coverage(
    llm: &dyn crate::ports::llm_caller_port::LlmCallerPort,
    artifact: &crate::generator::parsing::Artifact,
    analysis: &requirement_store::domain::analysis::Analysis,
    preferred_provider: std::option::Option<&str>,
) -> std::result::Result<f64, pipeline_core::PipelineError> {
    let mut sorted_paths: std::vec::Vec<&std::string::String> = artifact.keys().collect();
    sorted_paths.sort();
    let mut joined_code = std::string::String::new();
    for path in sorted_paths {
        joined_code.push_str(&artifact[path]);
        joined_code.push('\n');
    }
    let joined_code = truncate_chars(&joined_code, OVERALL_PROMPT_CAP);

    let prompt_text = std::format!(
        "Given this functionality and list of required components, judge how fully the following code covers them. Respond with a single JSON object: {{\"coverageScore\": number (0-100), \"reason\": string}}.\n\nFunctionality: {}\nComponents: {}\n\nCode:\n{}",
        analysis.functionality,
        analysis.components.join(", "),
        joined_code
    );

    let options = llm_registry::domain::call_options::CallOptions::new(EVALUATION_TEMPERATURE, std::option::Option::None);
    let outcome = llm
        .generate(&prompt_text, std::option::Option::None, preferred_provider, &options)
        .await?;

    std::result::Result::Ok(parse_functional_coverage(&outcome.text).coverage_score)
}

/// Step 3: requirement coverage, a 0.3/0.7 blend of file-structure
/// coverage (cheap, deterministic) and LLM-judged functional coverage.
async fn check_requirement_coverage(
    llm: &dyn crate::ports::llm_caller_port::LlmCallerPort,
    artifact: &crate::generator::parsing::Artifact,
    analysis: &requirement_store::domain::analysis::Analysis,
    preferred_provider: std::option::Option<&str>,
) -> std::result::Result<f64, pipeline_core::PipelineError> {
    let structure_score = file_structure_coverage(analysis, artifact);
    let functional_score = functional_coverage(llm, artifact, analysis, preferred_provider).await?;
    std::result::Result::Ok(FILE_STRUCTURE_COVERAGE_WEIGHT * structure_score * 100.0 + FUNCTIONAL_COVERAGE_WEIGHT * functional_score)
}

/// Runs all four quality-check steps and writes the resulting metric row.
/// The caller decides what to do with `metric.passed()` (default policy is
/// to commit regardless; gating is configuration-controlled).
pub async fn check_quality(
    llm: &dyn crate::ports::llm_caller_port::LlmCallerPort,
    task_id: &str,
    artifact: &crate::generator::parsing::Artifact,
    analysis: &requirement_store::domain::analysis::Analysis,
    language: requirement_store::domain::language::Language,
    preferred_provider: std::option::Option<&str>,
) -> std::result::Result<requirement_store::domain::quality_metric::QualityMetric, pipeline_core::PipelineError> {
    let syntax_validity_score = check_syntax_validity(llm, artifact, language, preferred_provider).await?;
    let (code_quality_score, static_analysis, feedback) = check_code_quality(llm, artifact, analysis, preferred_provider).await?;
    let requirement_coverage_score = check_requirement_coverage(llm, artifact, analysis, preferred_provider).await?;

    std::result::Result::Ok(requirement_store::domain::quality_metric::QualityMetric::new(
        task_id.to_string(),
        code_quality_score,
        requirement_coverage_score,
        syntax_validity_score,
        static_analysis,
        feedback,
    ))
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

    fn sample_artifact() -> crate::generator::parsing::Artifact {
        let mut artifact = crate::generator::parsing::Artifact::new();
        artifact.insert("src/index.ts".to_string(), "export const x = 1;".to_string());
        artifact.insert("src/util.ts".to_string(), "export const y = 2;".to_string());
        artifact
    }

    #[tokio::test]
    async fn test_check_quality_happy_path_aggregates_passing() {
        let llm = ScriptedLlm::new(std::vec![
            "valid",
            "valid",
            r#"{"totalScore": 92, "scores": {"correctness": 95, "completeness": 90, "codeQuality": 92, "errorHandling": 88, "security": 90}, "feedback": "solid", "issues": []}"#,
            r#"{"coverageScore": 95, "reason": "covers all components"}"#,
        ]);
        let analysis = requirement_store::domain::analysis::Analysis {
            file_structure: std::vec!["src/index.ts".to_string(), "src/util.ts".to_string()],
            ..requirement_store::domain::analysis::Analysis::default()
        };
        let metric = check_quality(&llm, "task-1", &sample_artifact(), &analysis, requirement_store::domain::language::Language::TypeScript, std::option::Option::None)
            .await
            .expect("check_quality should succeed");

        assert_eq!(metric.syntax_validity_score, 100.0);
        assert_eq!(metric.code_quality_score, 92.0);
        assert!(metric.passed());
    }

    #[tokio::test]
    async fn test_check_quality_scenario_matches_low_score_gate_failure() {
        let llm = ScriptedLlm::new(std::vec![
            "valid",
            "invalid",
            r#"{"totalScore": 40, "scores": {"correctness": 40, "completeness": 40, "codeQuality": 40, "errorHandling": 40, "security": 40}, "feedback": "needs work", "issues": ["missing error handling"]}"#,
            r#"{"coverageScore": 50, "reason": "partial"}"#,
        ]);
        let analysis = requirement_store::domain::analysis::Analysis::default();
        let metric = check_quality(&llm, "task-2", &sample_artifact(), &analysis, requirement_store::domain::language::Language::TypeScript, std::option::Option::None)
            .await
            .expect("check_quality should succeed");

        assert_eq!(metric.syntax_validity_score, 50.0);
        assert_eq!(metric.code_quality_score, 40.0);
        assert!(!metric.passed());
    }

    #[tokio::test]
    async fn test_check_quality_no_code_files_yields_zero_syntax_score() {
        let llm = ScriptedLlm::new(std::vec![
            r#"{"totalScore": 70, "scores": {"correctness": 70, "completeness": 70, "codeQuality": 70, "errorHandling": 70, "security": 70}, "feedback": "ok", "issues": []}"#,
            r#"{"coverageScore": 80, "reason": "fine"}"#,
        ]);
        let mut artifact = crate::generator::parsing::Artifact::new();
        artifact.insert("README.md".to_string(), "# Docs".to_string());
        let analysis = requirement_store::domain::analysis::Analysis::default();
        let metric = check_quality(&llm, "task-3", &artifact, &analysis, requirement_store::domain::language::Language::TypeScript, std::option::Option::None)
            .await
            .expect("check_quality should succeed");

        assert_eq!(metric.syntax_validity_score, 0.0);
    }

    #[test]
    fn test_file_structure_coverage_empty_required_is_full_coverage() {
        let analysis = requirement_store::domain::analysis::Analysis::default();
        assert_eq!(file_structure_coverage(&analysis, &sample_artifact()), 1.0);
    }

    #[test]
    fn test_file_structure_coverage_partial_match() {
        let analysis = requirement_store::domain::analysis::Analysis {
            file_structure: std::vec!["src/index.ts".to_string(), "src/missing.ts".to_string()],
            ..requirement_store::domain::analysis::Analysis::default()
        };
        assert_eq!(file_structure_coverage(&analysis, &sample_artifact()), 0.5);
    }
}
