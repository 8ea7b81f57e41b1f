use crate::gated::GatedBackend;
use mindloop_core::{CycleContext, MindloopResult, Task, ToolRegistry};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Executes one eligible task at a time.
///
/// A task naming a registered tool is run through the registry; anything
/// else (including a task naming an unregistered tool) is executed as a
/// reasoning request against the gated backend. Tool and backend call
/// failures propagate and abort the owning job.
pub struct Executor {
    tools: Arc<ToolRegistry>,
    backend: Arc<GatedBackend>,
}

impl Executor {
    /// Creates an executor over the tool registry and gated backend.
    pub fn new(tools: Arc<ToolRegistry>, backend: Arc<GatedBackend>) -> Self {
        Self { tools, backend }
    }

    /// Runs the task to completion and returns its result text.
    pub async fn execute(
        &self,
        task: &Task,
        context: &CycleContext,
        cancel: &CancellationToken,
    ) -> MindloopResult<String> {
        if let Some(tool_name) = task.tool.as_deref() {
            if self.tools.get(tool_name).is_some() {
                info!(task_id = %task.id, tool = %tool_name, "Executing tool task");
                let input = task.tool_input.as_deref().unwrap_or("");
                return self.tools.invoke(tool_name, input).await;
            }
        }

        info!(task_id = %task.id, "Executing reasoning task");
        let prompt = format!(
            "As an AI agent, execute the following task. Provide a comprehensive,\n\
             direct, and actionable result.\n\
             \n\
             Task: {description}\n\
             Progress so far: {completed} of {total} tasks completed.\n\
             \n\
             Focus on producing a clear and thorough response to fulfill the task.",
            description = task.description,
            completed = context.completed_tasks,
            total = context.total_tasks,
        );
        self.backend.generate(&prompt, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::TextBackend;
    use crate::governor::Governor;
    use async_trait::async_trait;
    use mindloop_core::{MindloopError, Tool, ToolDescriptor};
    use std::time::Duration;

    struct CannedBackend;

    #[async_trait]
    impl TextBackend for CannedBackend {
        async fn generate(&self, _prompt: &str) -> MindloopResult<String> {
            Ok("reasoned answer".to_string())
        }
    }

    struct UpperTool {
        descriptor: ToolDescriptor,
        fail: bool,
    }

    impl UpperTool {
        fn new(fail: bool) -> Self {
            Self {
                descriptor: ToolDescriptor {
                    name: "upper".to_string(),
                    description: "Uppercases its input.".to_string(),
                },
                fail,
            }
        }
    }

    #[async_trait]
    impl Tool for UpperTool {
        fn descriptor(&self) -> &ToolDescriptor {
            &self.descriptor
        }

        async fn invoke(&self, input: &str) -> MindloopResult<String> {
            if self.fail {
                return Err(MindloopError::Tool("tool exploded".into()));
            }
            Ok(input.to_uppercase())
        }
    }

    fn executor(fail_tool: bool) -> Executor {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(UpperTool::new(fail_tool)));
        Executor::new(
            Arc::new(registry),
            Arc::new(GatedBackend::new(
                Arc::new(CannedBackend),
                Governor::new(1),
                Duration::from_secs(5),
            )),
        )
    }

    #[tokio::test]
    async fn test_tool_task_uses_registry() {
        let task = Task::new("t1", "Uppercase something", 5).with_tool("upper", "hello");
        let result = executor(false)
            .execute(&task, &CycleContext::default(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(result, "HELLO");
    }

    #[tokio::test]
    async fn test_reasoning_task_uses_backend() {
        let task = Task::new("t1", "Think about gardening", 5);
        let result = executor(false)
            .execute(&task, &CycleContext::default(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(result, "reasoned answer");
    }

    #[tokio::test]
    async fn test_unregistered_tool_falls_back_to_reasoning() {
        let task = Task::new("t1", "Use a ghost tool", 5).with_tool("ghost", "input");
        let result = executor(false)
            .execute(&task, &CycleContext::default(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(result, "reasoned answer");
    }

    #[tokio::test]
    async fn test_tool_failure_propagates() {
        let task = Task::new("t1", "Uppercase something", 5).with_tool("upper", "hello");
        let err = executor(true)
            .execute(&task, &CycleContext::default(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, MindloopError::Tool(_)));
    }
}
