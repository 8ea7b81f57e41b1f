use crate::gated::GatedBackend;
use crate::parse::{parse_response, ParseOutcome};
use mindloop_core::{Assessment, CycleContext, Experience, MindloopResult, Task, TaskStatus};
use mindloop_memory::MemoryStore;
use std::collections::HashSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// How many memories to recall into the assessment prompt.
const RECALL_LIMIT: usize = 3;

/// How much of a task result the integration prompt quotes.
const RESULT_EXCERPT_CHARS: usize = 500;

/// Opens each cycle by evaluating progress toward the goal.
pub struct Assessor {
    backend: Arc<GatedBackend>,
}

impl Assessor {
    /// Creates an assessor over the gated backend.
    pub fn new(backend: Arc<GatedBackend>) -> Self {
        Self { backend }
    }

    /// Produces the cycle's assessment from the goal, the aggregate
    /// context, and recalled memories. Malformed output falls back to a
    /// conservative default; only a call failure propagates.
    pub async fn assess(
        &self,
        goal: &str,
        context: &CycleContext,
        memory: &MemoryStore,
        cancel: &CancellationToken,
    ) -> MindloopResult<Assessment> {
        let recalled = memory.retrieve(goal, RECALL_LIMIT).await;

        let prompt = format!(
            "You are an AI agent conducting self-assessment. Respond ONLY with valid JSON.\n\
             \n\
             GOAL: {goal}\n\
             COMPLETED_TASKS: {completed} of {total}\n\
             {recalled}\n\
             \n\
             Provide your assessment as a JSON object with these exact keys:\n\
             {{\n\
               \"progress_score\": <number 0-100 indicating closeness to the goal>,\n\
               \"gaps\": [\"knowledge or capability gaps\"],\n\
               \"risks\": [\"potential risks or obstacles\"],\n\
               \"recommendations\": [\"high-level next steps\"]\n\
             }}",
            completed = context.completed_tasks,
            total = context.total_tasks,
        );

        let response = self.backend.generate(&prompt, cancel).await?;
        match parse_response::<Assessment>(&response) {
            ParseOutcome::Parsed(assessment) => Ok(assessment),
            ParseOutcome::Unparsed(raw) => {
                warn!(raw = %raw, "Assessment output unparsable; using fallback");
                Ok(fallback_assessment())
            }
        }
    }
}

/// Turns the goal and current assessment into a fresh cycle task set.
pub struct Planner {
    backend: Arc<GatedBackend>,
}

impl Planner {
    /// Creates a planner over the gated backend.
    pub fn new(backend: Arc<GatedBackend>) -> Self {
        Self { backend }
    }

    /// Produces the cycle's task set. Malformed output falls back to a
    /// single direct-research task; duplicate ids within the produced set
    /// are dropped, first occurrence winning.
    pub async fn plan(
        &self,
        goal: &str,
        assessment: &Assessment,
        tool_names: &[String],
        cancel: &CancellationToken,
    ) -> MindloopResult<Vec<Task>> {
        let assessment_json = serde_json::to_string(assessment)?;
        let tools_json = serde_json::to_string(tool_names)?;

        let prompt = format!(
            "You are an AI task planner. Respond ONLY with a valid JSON array of tasks.\n\
             \n\
             MAIN_GOAL: {goal}\n\
             ASSESSMENT: {assessment_json}\n\
             AVAILABLE_TOOLS: {tools_json}\n\
             \n\
             Create 2-3 actionable tasks to advance the goal. A task is either a\n\
             research/analysis question for the AI, or an action using an available tool.\n\
             For a tool task set \"tool\" to the tool name and \"tool_input\" to its input;\n\
             otherwise leave both null. Task ids must be unique strings.\n\
             \n\
             JSON array format:\n\
             [{{\"id\": \"task_1\", \"description\": \"...\", \"priority\": 5,\n\
               \"dependencies\": [], \"tool\": null, \"tool_input\": null}}]",
        );

        let response = self.backend.generate(&prompt, cancel).await?;
        let tasks = match parse_response::<Vec<Task>>(&response) {
            ParseOutcome::Parsed(tasks) => tasks,
            ParseOutcome::Unparsed(raw) => {
                warn!(raw = %raw, "Plan output unparsable; using fallback task");
                fallback_plan(goal)
            }
        };
        Ok(dedupe_ids(tasks))
    }
}

/// Extracts learnings from a completed task and archives them.
pub struct Integrator {
    backend: Arc<GatedBackend>,
}

impl Integrator {
    /// Creates an integrator over the gated backend.
    pub fn new(backend: Arc<GatedBackend>) -> Self {
        Self { backend }
    }

    /// Reflects on a completed task, recording the first learning in the
    /// memory store. Malformed output falls back to an empty experience
    /// (nothing archived); only a call failure propagates.
    pub async fn integrate(
        &self,
        task: &Task,
        memory: &MemoryStore,
        cancel: &CancellationToken,
    ) -> MindloopResult<Experience> {
        let excerpt: String = task
            .result
            .as_deref()
            .unwrap_or("")
            .chars()
            .take(RESULT_EXCERPT_CHARS)
            .collect();

        let prompt = format!(
            "You are a learning AI. Reflect on the completed task and its result.\n\
             Respond ONLY with valid JSON.\n\
             \n\
             TASK: {description}\n\
             RESULT: {excerpt}\n\
             \n\
             Provide learning insights as a JSON object:\n\
             {{\n\
               \"learnings\": [\"a concise key insight or fact learned from the result\"],\n\
               \"adjustments\": [\"an adjustment for future plans\"],\n\
               \"confidence_shift\": <number from -10 to 10>\n\
             }}",
            description = task.description,
        );

        let response = self.backend.generate(&prompt, cancel).await?;
        let experience = match parse_response::<Experience>(&response) {
            ParseOutcome::Parsed(experience) => experience,
            ParseOutcome::Unparsed(raw) => {
                warn!(raw = %raw, "Experience output unparsable; using fallback");
                fallback_experience()
            }
        };

        if task.status == TaskStatus::Completed {
            if let Some(learning) = experience.learnings.first() {
                memory.add(&task.description, learning).await;
            }
        }

        Ok(experience)
    }
}

/// Conservative assessment used when the backend output is unparsable.
pub fn fallback_assessment() -> Assessment {
    Assessment {
        progress_score: 10,
        gaps: vec!["assessment output could not be parsed".to_string()],
        risks: Vec::new(),
        recommendations: vec!["proceed with direct research on the goal".to_string()],
    }
}

/// Single direct-research task used when the plan output is unparsable.
pub fn fallback_plan(goal: &str) -> Vec<Task> {
    vec![Task::new(
        "fallback",
        format!("Directly research and summarize: {goal}"),
        1,
    )]
}

/// Empty experience used when the integration output is unparsable.
pub fn fallback_experience() -> Experience {
    Experience {
        learnings: Vec::new(),
        adjustments: Vec::new(),
        confidence_shift: 0,
    }
}

/// Drops tasks whose id already appeared earlier in the set. Duplicate ids
/// would silently overwrite registry entries on merge, so the first
/// occurrence wins and the rest are logged away.
fn dedupe_ids(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(tasks.len());
    for task in tasks {
        if seen.insert(task.id.clone()) {
            unique.push(task);
        } else {
            info!(id = %task.id, "Dropping duplicate planner task id");
        }
    }
    unique
}
