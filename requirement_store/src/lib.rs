//! Requirement store library for task persistence and lifecycle management.
//!
//! This crate is the durable source of truth for the requirement-processing
//! pipeline. It is designed as an independent, focused library following
//! hexagonal architecture patterns with the HEXSER framework.
//!
//! The architecture consists of four hexagonal layers:
//! - Domain: pure business entities (Task, TaskStatus, Analysis, QualityMetric).
//! - Ports: interface definitions (TaskRepositoryPort, QualityMetricRepositoryPort).
//! - Adapters: port implementations (SqliteTaskAdapter, InMemoryTaskAdapter, ...).
//! - Use Cases: business logic orchestration (ManageRequirementTaskUseCase).
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial requirement_store crate split from pipeline_core.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod use_cases;
