//! Single call contract every protocol implementation must satisfy.
//!
//! Spec-mandated design: one trait, dispatched by `pipeline_core::config::Protocol`,
//! rather than one trait per provider. New protocols are added by extending the
//! enum and the dispatch routine, not by adding new trait hierarchies.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial LlmProtocolAdapterPort definition.

#[async_trait::async_trait]
pub trait LlmProtocolAdapterPort: std::marker::Send + std::marker::Sync {
    /// Sends a single prompt to the given provider entry and returns the
    /// extracted response text. Transport failures and non-2xx responses
    /// must surface as `PipelineError::provider_retryable`; a 2xx response
    /// whose body is missing the expected field must surface as
    /// `PipelineError::provider_parse`.
    async fn call(
        &self,
        entry: &pipeline_core::config::ProviderEntryConfig,
        prompt: &str,
        system: std::option::Option<&str>,
        options: &crate::domain::call_options::CallOptions,
    ) -> std::result::Result<std::string::String, pipeline_core::PipelineError>;
}
