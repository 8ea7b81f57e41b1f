use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a [`Job`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Accepted but not yet started.
    Pending,
    /// Cycles are running.
    InProgress,
    /// All cycles finished.
    Completed,
    /// Aborted by an unrecovered error or cancellation.
    Failed,
}

/// Structured self-assessment produced at the start of each cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    /// Closeness to the goal, 0–100.
    pub progress_score: u8,
    /// Knowledge or capability gaps.
    #[serde(default)]
    pub gaps: Vec<String>,
    /// Potential risks or obstacles.
    #[serde(default)]
    pub risks: Vec<String>,
    /// High-level next steps.
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Insights extracted after a task completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    /// Key insights or facts learned from the result.
    #[serde(default)]
    pub learnings: Vec<String>,
    /// Adjustments for future planning.
    #[serde(default)]
    pub adjustments: Vec<String>,
    /// Confidence change in [-10, 10].
    #[serde(default)]
    pub confidence_shift: i8,
}

/// The record of one executed task within a cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskReport {
    /// Registry identifier of the task.
    pub task_id: String,
    /// Task description at dispatch time.
    pub description: String,
    /// Result text the executor produced.
    pub result: String,
    /// Learnings extracted by the integrator.
    pub learnings: Vec<String>,
}

/// The detail log of one completed cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleReport {
    /// 1-based cycle number.
    pub cycle: u32,
    /// The cycle's opening self-assessment.
    pub assessment: Assessment,
    /// One entry per task dispatched this cycle.
    pub results: Vec<TaskReport>,
    /// Aggregate registry counters after the cycle.
    pub context: CycleContext,
    /// When the cycle finished.
    pub finished_at: DateTime<Utc>,
}

/// Aggregate counters recomputed once per cycle from the task registry.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CycleContext {
    /// Number of tasks in the registry with status `Completed`.
    pub completed_tasks: usize,
    /// Total number of tasks in the registry.
    pub total_tasks: usize,
}

/// One run of the cognitive loop toward a goal.
///
/// Owned exclusively by the orchestrator for its lifetime; externally
/// readable through the job store, never externally mutated. Job state is
/// process-memory only and is lost on restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier.
    pub id: Uuid,
    /// The goal this job works toward.
    pub goal: String,
    /// Current lifecycle status.
    pub status: JobStatus,
    /// Fraction of cycles completed, in [0, 1].
    pub progress: f64,
    /// Error message when the job failed.
    pub error: Option<String>,
    /// Per-cycle detail log; cycles recorded before a failure remain.
    pub cycles: Vec<CycleReport>,
    /// When the job was submitted.
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// Creates a new pending job for the given goal.
    pub fn new(goal: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            goal: goal.into(),
            status: JobStatus::Pending,
            progress: 0.0,
            error: None,
            cycles: Vec::new(),
            created_at: Utc::now(),
        }
    }
}
