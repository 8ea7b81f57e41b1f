use serde::{Deserialize, Serialize};

/// Lifecycle status of a [`Task`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created but not yet dispatched.
    #[default]
    Pending,
    /// Currently being executed.
    InProgress,
    /// Executed successfully.
    Completed,
    /// Execution failed.
    Failed,
}

/// A unit of work produced by the planner within one cycle.
///
/// Tasks accumulate in a job's registry across cycles and are never
/// deleted. A task may name a tool to invoke; otherwise it is executed as
/// a reasoning request against the text backend.
///
/// The serde shape matches the planner's JSON task descriptors, so a
/// well-formed backend response deserializes straight into `Vec<Task>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Planner-assigned identifier, unique within the owning job's registry.
    pub id: String,
    /// Human-readable description of the work.
    pub description: String,
    /// Dispatch priority; higher dispatches first.
    pub priority: i32,
    /// Current lifecycle status.
    #[serde(default)]
    pub status: TaskStatus,
    /// Identifiers of tasks that must complete before this one dispatches.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Result text once executed.
    #[serde(default)]
    pub result: Option<String>,
    /// Name of the tool to invoke, if this is a tool task.
    #[serde(default)]
    pub tool: Option<String>,
    /// Input passed to the tool.
    #[serde(default)]
    pub tool_input: Option<String>,
}

impl Task {
    /// Creates a new pending task with no dependencies.
    pub fn new(id: impl Into<String>, description: impl Into<String>, priority: i32) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            priority,
            status: TaskStatus::Pending,
            dependencies: Vec::new(),
            result: None,
            tool: None,
            tool_input: None,
        }
    }

    /// Sets the dependency list.
    pub fn with_dependencies(mut self, deps: Vec<String>) -> Self {
        self.dependencies = deps;
        self
    }

    /// Assigns a tool and its input.
    pub fn with_tool(mut self, tool: impl Into<String>, input: impl Into<String>) -> Self {
        self.tool = Some(tool.into());
        self.tool_input = Some(input.into());
        self
    }

    /// Whether the task reached a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, TaskStatus::Completed | TaskStatus::Failed)
    }
}
