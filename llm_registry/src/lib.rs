//! LLM provider registry: one call contract, four protocol wire shapes,
//! deterministic fallback across configured backends.
//!
//! Layers:
//! - Domain: call options and outcomes.
//! - Ports: `LlmProtocolAdapterPort`, the single dispatch contract.
//! - Adapters: `HttpLlmProtocolAdapter`, the reqwest-based implementation
//!   covering openai-chat, anthropic-messages, google-generate, and
//!   ollama-generate.
//! - Use Cases: `ProviderRegistry`, wrapping the port with fallback logic.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial llm_registry crate.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod use_cases;
