//! Defines the LlmCallerPort trait abstracting away the concrete provider
//! registry adapter type so Analyzer/Generator/Quality Checker and the
//! Orchestrator can depend on a trait object instead of threading the
//! registry's protocol-adapter type parameter through every layer.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial LlmCallerPort trait and ProviderRegistry blanket impl.

/// One uniform LLM call contract, with an optional preferred provider that
/// falls back to the registry's deterministic fallback chain on failure.
#[async_trait::async_trait]
pub trait LlmCallerPort: Send + Sync {
    /// Calls `preferred_provider` first if given; on failure (or if no
    /// preference was given), falls through to the registry's fallback
    /// chain, excluding the preferred provider from the retry so it is not
    /// tried twice.
    async fn generate(
        &self,
        prompt: &str,
        system: std::option::Option<&str>,
        preferred_provider: std::option::Option<&str>,
        options: &llm_registry::domain::call_options::CallOptions,
    ) -> std::result::Result<llm_registry::domain::call_outcome::CallOutcome, pipeline_core::PipelineError>;

    /// Calls every provider in `provider_ids`, collecting a result per
    /// provider rather than stopping at the first success. Used by the
    /// Generator's multi-model comparison mode.
    async fn generate_many(
        &self,
        prompt: &str,
        system: std::option::Option<&str>,
        provider_ids: &[std::string::String],
        options: &llm_registry::domain::call_options::CallOptions,
    ) -> std::vec::Vec<(std::string::String, std::result::Result<llm_registry::domain::call_outcome::CallOutcome, pipeline_core::PipelineError>)>;
}

#[async_trait::async_trait]
impl<A> LlmCallerPort for llm_registry::use_cases::provider_registry::ProviderRegistry<A>
where
    A: llm_registry::ports::llm_protocol_adapter_port::LlmProtocolAdapterPort,
{
    async fn generate(
        &self,
        prompt: &str,
        system: std::option::Option<&str>,
        preferred_provider: std::option::Option<&str>,
        options: &llm_registry::domain::call_options::CallOptions,
    ) -> std::result::Result<llm_registry::domain::call_outcome::CallOutcome, pipeline_core::PipelineError> {
        match preferred_provider {
            std::option::Option::Some(provider_id) => {
                match self.call(provider_id, prompt, system, options).await {
                    std::result::Result::Ok(outcome) => std::result::Result::Ok(outcome),
                    std::result::Result::Err(_) => {
                        self.call_with_fallback(prompt, system, options, &[provider_id.to_string()]).await
                    }
                }
            }
            std::option::Option::None => self.call_with_fallback(prompt, system, options, &[]).await,
        }
    }

    async fn generate_many(
        &self,
        prompt: &str,
        system: std::option::Option<&str>,
        provider_ids: &[std::string::String],
        options: &llm_registry::domain::call_options::CallOptions,
    ) -> std::vec::Vec<(std::string::String, std::result::Result<llm_registry::domain::call_outcome::CallOutcome, pipeline_core::PipelineError>)> {
        let futures_iter = provider_ids.iter().map(|provider_id| async move {
            let outcome = self.call(provider_id, prompt, system, options).await;
            (provider_id.clone(), outcome)
        });
        futures::future::join_all(futures_iter).await
    }
}
