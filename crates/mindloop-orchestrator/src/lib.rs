//! The Mindloop orchestration loop.
//!
//! Drives N assess → plan → execute → integrate cycles per job, ordering
//! task dispatch by priority under dependency gating, and exposing job
//! state to the gateway through a shared store.
//!
//! # Main types
//!
//! - [`Orchestrator`] — Engine running the cognitive loop for each job.
//! - [`TaskRegistry`] — Per-job task accumulation and dependency checks.
//! - [`dispatch_order`] — Stable priority-descending dispatch ordering.
//! - [`JobStore`] — Shared, read-snapshot view of all jobs.

/// The cycle-driving engine.
pub mod engine;
/// Per-job task registry and dependency policy.
pub mod registry;
/// Dispatch ordering.
pub mod scheduler;
/// Shared job state.
pub mod store;

pub use engine::Orchestrator;
pub use registry::{MissingDependencyPolicy, TaskRegistry};
pub use scheduler::dispatch_order;
pub use store::JobStore;
