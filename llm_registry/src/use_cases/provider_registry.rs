//! Dispatches prompts to a configured LLM provider, with deterministic
//! fallback across the rest of the registry when a provider fails.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial ProviderRegistry with call/callWithFallback/listAvailable/probe.

const PROBE_PROMPT: &str = "Respond with the single word OK and nothing else.";

/// Generic over the protocol adapter so tests can substitute a fake that
/// never makes a real HTTP call.
pub struct ProviderRegistry<A>
where
    A: crate::ports::llm_protocol_adapter_port::LlmProtocolAdapterPort,
{
    config: pipeline_core::config::ProviderRegistryConfig,
    adapter: A,
}

impl<A> ProviderRegistry<A>
where
    A: crate::ports::llm_protocol_adapter_port::LlmProtocolAdapterPort,
{
    pub fn new(config: pipeline_core::config::ProviderRegistryConfig, adapter: A) -> Self {
        Self { config, adapter }
    }

    /// Calls a single named provider. Fails with `NotFound` if the id is
    /// unknown and `Config` if it is known but disabled.
    pub async fn call(
        &self,
        provider_id: &str,
        prompt: &str,
        system: std::option::Option<&str>,
        options: &crate::domain::call_options::CallOptions,
    ) -> std::result::Result<crate::domain::call_outcome::CallOutcome, pipeline_core::PipelineError> {
        let entry = self
            .config
            .providers
            .get(provider_id)
            .ok_or_else(|| pipeline_core::PipelineError::not_found(std::format!("unknown provider {}", provider_id)))?;
        if !entry.enabled {
            return std::result::Result::Err(pipeline_core::PipelineError::config(std::format!("provider {} is disabled", provider_id)));
        }
        let text = self.adapter.call(entry, prompt, system, options).await?;
        std::result::Result::Ok(crate::domain::call_outcome::CallOutcome::new(provider_id.to_string(), text))
    }

    /// Builds the deterministic candidate order: `fallback_order` entries
    /// first (filtered to enabled, not excluded, known ids), then every
    /// remaining enabled, non-excluded provider id not already covered,
    /// sorted so two calls with identical config always try the same order.
    fn candidate_order(&self, exclude_providers: &[std::string::String]) -> std::vec::Vec<std::string::String> {
        let mut ordered: std::vec::Vec<std::string::String> = std::vec::Vec::new();
        let mut seen: std::collections::HashSet<std::string::String> = std::collections::HashSet::new();

        for id in &self.config.fallback_order {
            if seen.contains(id) {
                continue;
            }
            if exclude_providers.iter().any(|ex| ex == id) {
                continue;
            }
            if let std::option::Option::Some(entry) = self.config.providers.get(id) {
                if entry.enabled {
                    ordered.push(id.clone());
                    seen.insert(id.clone());
                }
            }
        }

        let mut remaining: std::vec::Vec<std::string::String> = self
            .config
            .providers
            .values()
            .filter(|e| e.enabled)
            .map(|e| e.id.clone())
            .filter(|id| !seen.contains(id))
            .filter(|id| !exclude_providers.iter().any(|ex| ex == id))
            .collect();
        remaining.sort();
        ordered.extend(remaining);
        ordered
    }

    /// Tries each candidate in `candidate_order` until one succeeds.
    /// Returns the last error if every candidate fails, or a `NotFound`
    /// error if the registry has no eligible candidates at all.
    pub async fn call_with_fallback(
        &self,
        prompt: &str,
        system: std::option::Option<&str>,
        options: &crate::domain::call_options::CallOptions,
        exclude_providers: &[std::string::String],
    ) -> std::result::Result<crate::domain::call_outcome::CallOutcome, pipeline_core::PipelineError> {
        let candidates = self.candidate_order(exclude_providers);
        if candidates.is_empty() {
            return std::result::Result::Err(pipeline_core::PipelineError::not_found("no eligible LLM providers configured"));
        }

        let mut last_error: std::option::Option<pipeline_core::PipelineError> = std::option::Option::None;
        for provider_id in &candidates {
            match self.call(provider_id, prompt, system, options).await {
                std::result::Result::Ok(outcome) => return std::result::Result::Ok(outcome),
                std::result::Result::Err(err) => last_error = std::option::Option::Some(err),
            }
        }

        std::result::Result::Err(last_error.unwrap_or_else(|| pipeline_core::PipelineError::unknown("all providers failed with no recorded error")))
    }

    /// Lists enabled provider ids, in the order `candidate_order` would try them.
    pub fn list_available(&self) -> std::vec::Vec<std::string::String> {
        self.candidate_order(&[])
    }

    /// Sends a canary prompt to a single provider and reports whether the
    /// response text contains "ok" case-insensitively.
    pub async fn probe(&self, provider_id: &str) -> std::result::Result<bool, pipeline_core::PipelineError> {
        let outcome = self
            .call(provider_id, PROBE_PROMPT, std::option::Option::None, &crate::domain::call_options::CallOptions::default())
            .await?;
        std::result::Result::Ok(outcome.text.to_lowercase().contains("ok"))
    }
}
