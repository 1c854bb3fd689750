//! Code generation: turns an `Analysis` into a generated code artifact by
//! prompting an LLM and tolerantly parsing its response, including a
//! multi-model comparison mode that fans out to several providers.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial generate()/generate_comparison().

pub mod parsing;
pub mod prompt;

/// Generation temperature allows some variation in code shape while staying
/// mostly deterministic.
const GENERATION_TEMPERATURE: f64 = 0.2;

/// Result of a single-model generation pass.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub artifact: parsing::Artifact,
    pub provider_id: std::string::String,
    pub output_path: std::string::String,
}

/// One provider's generation result from a multi-model comparison fan-out.
#[derive(Debug, Clone)]
pub struct ComparisonCandidate {
    pub provider_id: std::string::String,
    pub artifact: parsing::Artifact,
}

fn derive_output_path(analysis: &requirement_store::domain::analysis::Analysis, language: requirement_store::domain::language::Language) -> std::string::String {
    analysis
        .mode_first_segment()
        .unwrap_or_else(|| language.default_output_path().to_string())
}

/// Runs the Generator stage against a single (preferred, with-fallback)
/// provider.
pub async fn generate(
    llm: &dyn crate::ports::llm_caller_port::LlmCallerPort,
    analysis: &requirement_store::domain::analysis::Analysis,
    requirement_text: &str,
    language: requirement_store::domain::language::Language,
    additional_context: std::option::Option<&str>,
    preferred_provider: std::option::Option<&str>,
) -> std::result::Result<GenerationResult, pipeline_core::PipelineError> {
    let prompt_text = prompt::build_generation_prompt(analysis, requirement_text, language, additional_context);
    let options = llm_registry::domain::call_options::CallOptions::new(GENERATION_TEMPERATURE, std::option::Option::None);

    let outcome = llm
        .generate(
            &prompt_text,
            std::option::Option::Some("You are an expert software engineer. You always answer with a single JSON object mapping file paths to file contents."),
            preferred_provider,
            &options,
        )
        .await?;

    let artifact = parsing::parse_generation_response(&outcome.text);
    std::result::Result::Ok(GenerationResult {
        artifact,
        provider_id: outcome.provider_id,
        output_path: derive_output_path(analysis, language),
    })
}

/// Runs the Generator stage against every provider in `provider_ids`,
/// returning one candidate per provider that produced a non-empty artifact.
/// Callers select the candidate with the greatest file count as the
/// main-branch commit and push the rest as comparison branches; this
/// function does not decide that split itself.
pub async fn generate_comparison(
    llm: &dyn crate::ports::llm_caller_port::LlmCallerPort,
    analysis: &requirement_store::domain::analysis::Analysis,
    requirement_text: &str,
    language: requirement_store::domain::language::Language,
    additional_context: std::option::Option<&str>,
    provider_ids: &[std::string::String],
) -> (std::vec::Vec<ComparisonCandidate>, std::string::String) {
    let prompt_text = prompt::build_generation_prompt(analysis, requirement_text, language, additional_context);
    let options = llm_registry::domain::call_options::CallOptions::new(GENERATION_TEMPERATURE, std::option::Option::None);

    let outcomes = llm
        .generate_many(
            &prompt_text,
            std::option::Option::Some("You are an expert software engineer. You always answer with a single JSON object mapping file paths to file contents."),
            provider_ids,
            &options,
        )
        .await;

    let candidates: std::vec::Vec<ComparisonCandidate> = outcomes
        .into_iter()
        .filter_map(|(provider_id, result)| result.ok().map(|outcome| (provider_id, outcome)))
        .map(|(provider_id, outcome)| ComparisonCandidate {
            provider_id,
            artifact: parsing::parse_generation_response(&outcome.text),
        })
        .filter(|candidate| !candidate.artifact.is_empty())
        .collect();

    (candidates, derive_output_path(analysis, language))
}

/// Picks the candidate with the greatest file count as the main-branch
/// winner, returning the rest as comparison-branch candidates, in their
/// original relative order.
pub fn select_main_candidate(candidates: std::vec::Vec<ComparisonCandidate>) -> std::option::Option<(ComparisonCandidate, std::vec::Vec<ComparisonCandidate>)> {
    if candidates.is_empty() {
        return std::option::Option::None;
    }
    let winner_index = candidates
        .iter()
        .enumerate()
        .max_by_key(|(_, candidate)| candidate.artifact.len())
        .map(|(index, _)| index)
        .expect("candidates is non-empty");

    let mut remaining = candidates;
    let winner = remaining.remove(winner_index);
    std::option::Option::Some((winner, remaining))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeLlm {
        single_response: std::string::String,
        many_responses: std::vec::Vec<(std::string::String, std::string::String)>,
    }

    #[async_trait::async_trait]
    impl crate::ports::llm_caller_port::LlmCallerPort for FakeLlm {
        async fn generate(
            &self,
            _prompt: &str,
            _system: std::option::Option<&str>,
            _preferred_provider: std::option::Option<&str>,
            _options: &llm_registry::domain::call_options::CallOptions,
        ) -> std::result::Result<llm_registry::domain::call_outcome::CallOutcome, pipeline_core::PipelineError> {
            std::result::Result::Ok(llm_registry::domain::call_outcome::CallOutcome::new("openai-chat".to_string(), self.single_response.clone()))
        }

        async fn generate_many(
            &self,
            _prompt: &str,
            _system: std::option::Option<&str>,
            _provider_ids: &[std::string::String],
            _options: &llm_registry::domain::call_options::CallOptions,
        ) -> std::vec::Vec<(std::string::String, std::result::Result<llm_registry::domain::call_outcome::CallOutcome, pipeline_core::PipelineError>)> {
            self.many_responses
                .iter()
                .map(|(provider_id, text)| (provider_id.clone(), std::result::Result::Ok(llm_registry::domain::call_outcome::CallOutcome::new(provider_id.clone(), text.clone()))))
                .collect()
        }
    }

    #[tokio::test]
    async fn test_generate_derives_output_path_from_analysis() {
        let llm = FakeLlm {
            single_response: r#"{"lib/todo.ts": "export const x = 1;"}"#.to_string(),
            many_responses: std::vec::Vec::new(),
        };
        let analysis = requirement_store::domain::analysis::Analysis {
            file_structure: std::vec!["lib/todo.ts".to_string(), "lib/todo.test.ts".to_string()],
            ..requirement_store::domain::analysis::Analysis::default()
        };
        let result = generate(&llm, &analysis, "Build a todo service", requirement_store::domain::language::Language::TypeScript, std::option::Option::None, std::option::Option::None)
            .await
            .expect("generate should succeed");
        assert_eq!(result.output_path, "lib");
        assert_eq!(result.provider_id, "openai-chat");
    }

    #[tokio::test]
    async fn test_generate_falls_back_to_language_default_output_path() {
        let llm = FakeLlm {
            single_response: r#"{"main.go": "package main"}"#.to_string(),
            many_responses: std::vec::Vec::new(),
        };
        let analysis = requirement_store::domain::analysis::Analysis::default();
        let result = generate(&llm, &analysis, "Build a service", requirement_store::domain::language::Language::Go, std::option::Option::None, std::option::Option::None)
            .await
            .expect("generate should succeed");
        assert_eq!(result.output_path, "pkg");
    }

    #[tokio::test]
    async fn test_select_main_candidate_picks_largest_file_count() {
        let llm = FakeLlm {
            single_response: std::string::String::new(),
            many_responses: std::vec![
                ("provider-a".to_string(), r#"{"a.ts": "1", "b.ts": "2"}"#.to_string()),
                ("provider-b".to_string(), r#"{"a.ts": "1", "b.ts": "2", "c.ts": "3", "d.ts": "4"}"#.to_string()),
                ("provider-c".to_string(), r#"{"a.ts": "1"}"#.to_string()),
            ],
        };
        let analysis = requirement_store::domain::analysis::Analysis::default();
        let (candidates, _output_path) = generate_comparison(&llm, &analysis, "Build a service", requirement_store::domain::language::Language::TypeScript, std::option::Option::None, &["provider-a".to_string(), "provider-b".to_string(), "provider-c".to_string()]).await;
        assert_eq!(candidates.len(), 3);

        let (winner, remaining) = select_main_candidate(candidates).expect("candidates is non-empty");
        assert_eq!(winner.provider_id, "provider-b");
        assert_eq!(winner.artifact.len(), 4);
        assert_eq!(remaining.len(), 2);
    }

    #[test]
    fn test_select_main_candidate_empty_input() {
        assert!(select_main_candidate(std::vec::Vec::new()).is_none());
    }
}
