//! Requirement analysis: turns raw requirement text into a structured
//! `Analysis` by prompting an LLM and tolerantly parsing its response.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial analyze() tying prompt + call + parsing together.

pub mod parsing;
pub mod prompt;

/// Analysis temperature sits low on purpose: this stage extracts structure
/// from the requirement text rather than generating creative prose.
const ANALYSIS_TEMPERATURE: f64 = 0.15;

/// Runs the Analyzer stage: builds the prompt, calls the LLM (preferring
/// `preferred_provider` with fallback), and parses the response into an
/// `Analysis`. Returns the analysis alongside the id of the provider that
/// actually answered, so callers can record `details.analysisModel`.
pub async fn analyze(
    llm: &dyn crate::ports::llm_caller_port::LlmCallerPort,
    requirement_text: &str,
    language: requirement_store::domain::language::Language,
    additional_context: std::option::Option<&str>,
    template_content: std::option::Option<&str>,
    preferred_provider: std::option::Option<&str>,
) -> std::result::Result<(requirement_store::domain::analysis::Analysis, std::string::String), pipeline_core::PipelineError> {
    let prompt_text = prompt::build_analysis_prompt(requirement_text, language, additional_context, template_content);
    let options = llm_registry::domain::call_options::CallOptions::new(ANALYSIS_TEMPERATURE, std::option::Option::None);

    let outcome = llm
        .generate(
            &prompt_text,
            std::option::Option::Some("You are a precise software requirements analyst. You always answer with structured JSON."),
            preferred_provider,
            &options,
        )
        .await?;

    let analysis = parsing::parse_analysis_response(&outcome.text);
    std::result::Result::Ok((analysis, outcome.provider_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeLlm {
        response: std::string::String,
        provider_id: std::string::String,
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
            std::result::Result::Ok(llm_registry::domain::call_outcome::CallOutcome::new(self.provider_id.clone(), self.response.clone()))
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

    #[tokio::test]
    async fn test_analyze_returns_parsed_analysis_and_provider_id() {
        let llm = FakeLlm {
            response: r#"{"title":"Todo API","functionality":"CRUD for todos","components":["TodoController"],"inputsOutputs":"REST JSON","dependencies":"none","fileStructure":["src/todo.controller.ts"]}"#.to_string(),
            provider_id: "openai-chat".to_string(),
        };

        let (analysis, provider_id) = analyze(&llm, "Build a todo API", requirement_store::domain::language::Language::TypeScript, std::option::Option::None, std::option::Option::None, std::option::Option::None)
            .await
            .expect("analyze should succeed");

        assert_eq!(analysis.title, "Todo API");
        assert_eq!(provider_id, "openai-chat");
    }

    #[tokio::test]
    async fn test_analyze_never_fails_on_unparseable_response() {
        let llm = FakeLlm { response: "I don't understand.".to_string(), provider_id: "ollama-generate".to_string() };

        let (analysis, _provider_id) = analyze(&llm, "Build something", requirement_store::domain::language::Language::Python, std::option::Option::None, std::option::Option::None, std::option::Option::None)
            .await
            .expect("analyze should still succeed, yielding an empty-but-valid analysis");

        assert_eq!(analysis.title, "");
    }
}
