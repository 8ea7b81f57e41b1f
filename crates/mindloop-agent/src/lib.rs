//! Backend access and cognitive phases for the Mindloop agent loop.
//!
//! Everything that talks to the generative text backend lives here: the
//! process-wide [`Governor`] bounding concurrent calls, the [`TextBackend`]
//! trait with its OpenAI-compatible implementation, the [`GatedBackend`]
//! wrapper adding the governor permit, a bounded timeout, and cooperative
//! cancellation, and the [`Assessor`] / [`Planner`] / [`Integrator`] /
//! [`Executor`] phase components with their defensive output parsing.

/// Text backend trait and the OpenAI-compatible HTTP client.
pub mod backend;
/// Backend client configuration.
pub mod config;
/// Task execution against tools or the backend.
pub mod executor;
/// Governor-gated, timeout-bounded, cancellable backend access.
pub mod gated;
/// Bounded-concurrency gate for backend calls.
pub mod governor;
/// Defensive parsing of schema-less backend output.
pub mod parse;
/// Assessment, planning, and experience-integration phases.
pub mod phases;

pub use backend::{OpenAiBackend, TextBackend};
pub use config::ModelConfig;
pub use executor::Executor;
pub use gated::GatedBackend;
pub use governor::Governor;
pub use parse::ParseOutcome;
pub use phases::{Assessor, Integrator, Planner};
