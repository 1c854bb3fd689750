//! Priority job queue for the requirement-processing pipeline.
//!
//! Shares the `jobs` table `requirement_store::adapters::sqlite_task_adapter`
//! creates, connecting its own pool to the same database file rather than
//! taking a Cargo dependency on that crate. The two crates agree on the
//! table shape by convention, documented in the workspace's design notes.
//!
//! Layers:
//! - Domain: `Job`, `JobState`, `QueueStats`.
//! - Ports: `JobQueuePort`, the dequeue/retry/stats contract.
//! - Adapters: `SqliteJobQueueAdapter`.
//! - Use Cases: `WorkerPool`, the Semaphore-bounded processing loop.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial job_queue crate.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod use_cases;
