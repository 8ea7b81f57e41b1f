use crate::registry::{MissingDependencyPolicy, TaskRegistry};
use crate::scheduler::dispatch_order;
use crate::store::JobStore;
use chrono::Utc;
use mindloop_agent::{Assessor, Executor, GatedBackend, Integrator, Planner};
use mindloop_core::{
    CycleReport, Job, JobStatus, MindloopError, MindloopResult, TaskReport, ToolRegistry,
};
use mindloop_memory::MemoryStore;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use uuid::Uuid;

/// The cognitive-loop engine.
///
/// Each job runs as one cooperative sequential flow: cycles execute in
/// order, and within a cycle eligible tasks run to completion one at a
/// time. Many jobs may run concurrently; they contend only on the
/// governor inside the gated backend and on the memory store's write
/// lock.
pub struct Orchestrator {
    assessor: Assessor,
    planner: Planner,
    integrator: Integrator,
    executor: Executor,
    memory: Arc<MemoryStore>,
    tools: Arc<ToolRegistry>,
    jobs: JobStore,
    policy: MissingDependencyPolicy,
}

impl Orchestrator {
    /// Creates an engine over the shared backend, memory, tools, and job
    /// store.
    pub fn new(
        backend: Arc<GatedBackend>,
        memory: Arc<MemoryStore>,
        tools: Arc<ToolRegistry>,
        jobs: JobStore,
    ) -> Self {
        Self {
            assessor: Assessor::new(backend.clone()),
            planner: Planner::new(backend.clone()),
            integrator: Integrator::new(backend.clone()),
            executor: Executor::new(tools.clone(), backend),
            memory,
            tools,
            jobs,
            policy: MissingDependencyPolicy::default(),
        }
    }

    /// Overrides the missing-dependency policy for new jobs.
    pub fn with_missing_dependency_policy(mut self, policy: MissingDependencyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The shared job store.
    pub fn jobs(&self) -> &JobStore {
        &self.jobs
    }

    /// Registers a job and spawns its loop onto the runtime. Returns the
    /// job id immediately; progress is observable through the store.
    pub async fn start(self: &Arc<Self>, goal: impl Into<String>, iterations: u32) -> Uuid {
        let job = Job::new(goal);
        let job_id = job.id;
        let goal = job.goal.clone();
        let cancel = CancellationToken::new();
        self.jobs.insert(job, cancel.clone()).await;

        let engine = Arc::clone(self);
        tokio::spawn(async move {
            engine.run(job_id, &goal, iterations, cancel).await;
        });

        job_id
    }

    /// Runs a job to its terminal status.
    pub async fn run(&self, job_id: Uuid, goal: &str, iterations: u32, cancel: CancellationToken) {
        info!(job_id = %job_id, iterations, "Job starting");
        self.jobs
            .update(job_id, |job| job.status = JobStatus::InProgress)
            .await;

        match self.drive(job_id, goal, iterations, &cancel).await {
            Ok(()) => {
                info!(job_id = %job_id, "Job completed");
                self.jobs
                    .update(job_id, |job| {
                        job.status = JobStatus::Completed;
                        job.progress = 1.0;
                    })
                    .await;
            }
            Err(e) => {
                error!(job_id = %job_id, error = %e, "Job failed");
                self.jobs
                    .update(job_id, |job| {
                        job.status = JobStatus::Failed;
                        job.error = Some(e.to_string());
                    })
                    .await;
            }
        }
    }

    /// Drives every cycle of one job. Any unrecovered error aborts the
    /// job; reports from cycles already finished remain on the job.
    async fn drive(
        &self,
        job_id: Uuid,
        goal: &str,
        iterations: u32,
        cancel: &CancellationToken,
    ) -> MindloopResult<()> {
        let mut registry = TaskRegistry::with_policy(self.policy);

        for cycle in 1..=iterations {
            if cancel.is_cancelled() {
                return Err(MindloopError::Cancelled);
            }
            let context = registry.context();

            let assessment = self
                .assessor
                .assess(goal, &context, &self.memory, cancel)
                .await?;
            debug!(job_id = %job_id, cycle, score = assessment.progress_score, "Assessment done");

            let planned = self
                .planner
                .plan(goal, &assessment, &self.tools.names(), cancel)
                .await?;
            info!(job_id = %job_id, cycle, tasks = planned.len(), "Plan ready");
            for task in &planned {
                registry.merge(task.clone());
            }

            // One linear pass in priority order; ineligible tasks wait
            // until the next cycle at the earliest.
            let mut results = Vec::new();
            for id in dispatch_order(&planned) {
                if cancel.is_cancelled() {
                    return Err(MindloopError::Cancelled);
                }
                let task = match registry.get(&id) {
                    Some(task) => task.clone(),
                    None => continue,
                };
                if !registry.dependencies_met(&task) {
                    debug!(job_id = %job_id, task_id = %id, "Dependencies unmet; skipping for this cycle");
                    continue;
                }

                registry.mark_in_progress(&id);
                let result = self.executor.execute(&task, &context, cancel).await?;
                registry.mark_completed(&id, result.clone());

                let mut completed = task;
                completed.status = mindloop_core::TaskStatus::Completed;
                completed.result = Some(result.clone());
                let experience = self
                    .integrator
                    .integrate(&completed, &self.memory, cancel)
                    .await?;

                results.push(TaskReport {
                    task_id: id,
                    description: completed.description,
                    result,
                    learnings: experience.learnings,
                });
            }

            let context = registry.context();
            let report = CycleReport {
                cycle,
                assessment,
                results,
                context,
                finished_at: Utc::now(),
            };
            self.jobs
                .update(job_id, |job| {
                    job.cycles.push(report);
                    job.progress = f64::from(cycle) / f64::from(iterations);
                })
                .await;
            info!(
                job_id = %job_id,
                cycle,
                completed = context.completed_tasks,
                total = context.total_tasks,
                "Cycle finished"
            );
        }

        Ok(())
    }
}
