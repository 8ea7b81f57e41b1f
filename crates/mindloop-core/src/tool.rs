use crate::{MindloopError, MindloopResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Metadata describing a tool's interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Name the planner refers to the tool by.
    pub name: String,
    /// What the tool does, surfaced to the planner prompt.
    pub description: String,
}

/// Trait all executor-invocable tools implement.
///
/// Tools take a free-text input and return free-text output; the executor
/// treats a tool failure the same as a backend call failure (it aborts the
/// owning job).
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's descriptor.
    fn descriptor(&self) -> &ToolDescriptor;

    /// Runs the tool against the given input.
    async fn invoke(&self, input: &str) -> MindloopResult<String>;
}

/// Central name → tool lookup consumed by the executor.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registers a tool under its descriptor name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.descriptor().name.clone();
        info!(tool = %name, "Registered tool");
        self.tools.insert(name, tool);
    }

    /// Looks up a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Invokes the named tool, erroring on unknown names.
    pub async fn invoke(&self, name: &str, input: &str) -> MindloopResult<String> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| MindloopError::Tool(format!("Unknown tool: {name}")))?;
        tool.invoke(input).await
    }

    /// Descriptors of all registered tools.
    pub fn descriptors(&self) -> Vec<&ToolDescriptor> {
        self.tools.values().map(|t| t.descriptor()).collect()
    }

    /// Names of all registered tools.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
