//! Result of a successful call through the provider registry, tagged with
//! the provider that actually answered (needed by callWithFallback callers
//! that want to know which candidate won).
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial CallOutcome definition.

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CallOutcome {
    pub provider_id: String,
    pub text: String,
}

impl CallOutcome {
    pub fn new(provider_id: String, text: String) -> Self {
        Self { provider_id, text }
    }
}
