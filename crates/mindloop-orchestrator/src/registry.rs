use mindloop_core::{CycleContext, Task, TaskStatus};
use std::collections::HashMap;
use tracing::warn;

/// How [`TaskRegistry::dependencies_met`] treats a dependency id that is
/// not present in the registry.
///
/// The loop's planner may emit forward or cross-cycle references; whether
/// those gate dispatch is an explicit policy rather than an accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingDependencyPolicy {
    /// An absent id is trivially satisfied (the historical behavior).
    #[default]
    TreatAsSatisfied,
    /// An absent id blocks the task until it appears and completes.
    Block,
}

/// Per-job task registry.
///
/// Tasks accumulate across cycles and are never deleted. Owned exclusively
/// by the engine driving the job; nothing else mutates it.
pub struct TaskRegistry {
    tasks: HashMap<String, Task>,
    policy: MissingDependencyPolicy,
}

impl TaskRegistry {
    /// Creates an empty registry with the default missing-dependency policy.
    pub fn new() -> Self {
        Self::with_policy(MissingDependencyPolicy::default())
    }

    /// Creates an empty registry with the given policy.
    pub fn with_policy(policy: MissingDependencyPolicy) -> Self {
        Self {
            tasks: HashMap::new(),
            policy,
        }
    }

    /// Merges a planner task into the registry. An id seen in an earlier
    /// cycle is replaced by the fresh task, matching planner authority
    /// over its own ids.
    pub fn merge(&mut self, task: Task) {
        if self.tasks.contains_key(&task.id) {
            warn!(id = %task.id, "Planner reused a registry task id; replacing earlier task");
        }
        self.tasks.insert(task.id.clone(), task);
    }

    /// Looks up a task by id.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Whether every dependency of `task` is satisfied: present ids must
    /// be Completed, absent ids follow the configured policy.
    pub fn dependencies_met(&self, task: &Task) -> bool {
        task.dependencies.iter().all(|dep| match self.tasks.get(dep) {
            Some(dep_task) => dep_task.status == TaskStatus::Completed,
            None => self.policy == MissingDependencyPolicy::TreatAsSatisfied,
        })
    }

    /// Marks a task as dispatched.
    pub fn mark_in_progress(&mut self, id: &str) -> bool {
        match self.tasks.get_mut(id) {
            Some(task) => {
                task.status = TaskStatus::InProgress;
                true
            }
            None => false,
        }
    }

    /// Marks a task completed with its result text.
    pub fn mark_completed(&mut self, id: &str, result: impl Into<String>) -> bool {
        match self.tasks.get_mut(id) {
            Some(task) => {
                task.status = TaskStatus::Completed;
                task.result = Some(result.into());
                true
            }
            None => false,
        }
    }

    /// Recomputes the aggregate counters from the full registry.
    pub fn context(&self) -> CycleContext {
        CycleContext {
            completed_tasks: self
                .tasks
                .values()
                .filter(|t| t.status == TaskStatus::Completed)
                .count(),
            total_tasks: self.tasks.len(),
        }
    }

    /// Total number of registered tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the registry holds no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_and_context() {
        let mut registry = TaskRegistry::new();
        registry.merge(Task::new("t1", "one", 5));
        registry.merge(Task::new("t2", "two", 3));

        let context = registry.context();
        assert_eq!(context.total_tasks, 2);
        assert_eq!(context.completed_tasks, 0);

        registry.mark_completed("t1", "done");
        assert_eq!(registry.context().completed_tasks, 1);
        assert_eq!(registry.get("t1").unwrap().result.as_deref(), Some("done"));
    }

    #[test]
    fn test_dependencies_met_requires_completion() {
        let mut registry = TaskRegistry::new();
        registry.merge(Task::new("t1", "one", 5));
        let gated = Task::new("t2", "two", 9).with_dependencies(vec!["t1".to_string()]);
        registry.merge(gated.clone());

        assert!(!registry.dependencies_met(&gated));
        registry.mark_completed("t1", "done");
        assert!(registry.dependencies_met(&gated));
    }

    #[test]
    fn test_missing_dependency_satisfied_by_default() {
        let registry = TaskRegistry::new();
        let task = Task::new("t1", "one", 5).with_dependencies(vec!["ghost".to_string()]);
        assert!(registry.dependencies_met(&task));
    }

    #[test]
    fn test_missing_dependency_blocks_under_block_policy() {
        let mut registry = TaskRegistry::with_policy(MissingDependencyPolicy::Block);
        let task = Task::new("t1", "one", 5).with_dependencies(vec!["ghost".to_string()]);
        assert!(!registry.dependencies_met(&task));

        registry.merge(Task::new("ghost", "the dep", 1));
        assert!(!registry.dependencies_met(&task));
        registry.mark_completed("ghost", "done");
        assert!(registry.dependencies_met(&task));
    }

    #[test]
    fn test_merge_replaces_reused_id() {
        let mut registry = TaskRegistry::new();
        registry.merge(Task::new("t1", "old", 1));
        registry.mark_completed("t1", "done");
        registry.merge(Task::new("t1", "new", 2));

        let task = registry.get("t1").unwrap();
        assert_eq!(task.description, "new");
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_mark_unknown_ids() {
        let mut registry = TaskRegistry::new();
        assert!(!registry.mark_in_progress("nope"));
        assert!(!registry.mark_completed("nope", "x"));
    }
}
