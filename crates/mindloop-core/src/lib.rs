//! Core types and error definitions for the Mindloop agent loop.
//!
//! This crate provides the foundational types shared across all Mindloop
//! crates: the unified error enum, the task and job data model, and the
//! tool abstraction consumed by the executor.
//!
//! # Main types
//!
//! - [`MindloopError`] — Unified error enum for all Mindloop subsystems.
//! - [`MindloopResult`] — Convenience alias for `Result<T, MindloopError>`.
//! - [`Task`] / [`TaskStatus`] — A unit of work planned within one cycle.
//! - [`Job`] / [`JobStatus`] / [`CycleReport`] — One run of the cognitive
//!   loop and its per-cycle detail log.
//! - [`Tool`] / [`ToolRegistry`] — Name-to-function lookup used by the
//!   executor.

/// Unified error enum and result alias.
pub mod error;
/// Job lifecycle, per-cycle reports, and aggregate context.
pub mod job;
/// Task data model.
pub mod task;
/// Tool trait, descriptors, and registry.
pub mod tool;

pub use error::{MindloopError, MindloopResult};
pub use job::{Assessment, CycleContext, CycleReport, Experience, Job, JobStatus, TaskReport};
pub use task::{Task, TaskStatus};
pub use tool::{Tool, ToolDescriptor, ToolRegistry};
