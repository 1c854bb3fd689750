//! Per-call tuning knobs shared across every protocol adapter.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial CallOptions definition.

/// Options that every protocol adapter maps onto its own wire shape.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct CallOptions {
    pub temperature: f64,
    pub max_tokens: std::option::Option<u32>,
}

impl CallOptions {
    pub fn new(temperature: f64, max_tokens: std::option::Option<u32>) -> Self {
        Self { temperature, max_tokens }
    }
}

impl std::default::Default for CallOptions {
    fn default() -> Self {
        Self { temperature: 0.7, max_tokens: std::option::Option::None }
    }
}
