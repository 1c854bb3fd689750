//! Pipeline core: shared configuration and error taxonomy.
//!
//! This crate provides the canonical configuration structure for the
//! requirement-processing pipeline, including LLM provider registry
//! settings, queue tuning, Git identity, and the error taxonomy shared
//! by every downstream crate.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial pipeline_core crate for unified configuration system.

pub mod config;
pub mod error;

pub use config::PipelineConfig;
pub use error::{ErrorCategory, PipelineError};
