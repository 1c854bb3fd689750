//! Port definitions for the LLM provider registry.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial module declarations.

pub mod llm_protocol_adapter_port;
