use mindloop_core::Job;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

struct JobSlot {
    job: Job,
    cancel: CancellationToken,
}

/// Shared view of all jobs in the process.
///
/// The engine is the only writer for a job's state; the gateway reads
/// snapshots and may trigger cancellation. Job state is process-memory
/// only and is lost on restart.
#[derive(Clone, Default)]
pub struct JobStore {
    slots: Arc<RwLock<HashMap<Uuid, JobSlot>>>,
}

impl JobStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a job with its cancellation token.
    pub async fn insert(&self, job: Job, cancel: CancellationToken) {
        self.slots
            .write()
            .await
            .insert(job.id, JobSlot { job, cancel });
    }

    /// Snapshot of a job's current state.
    pub async fn get(&self, id: Uuid) -> Option<Job> {
        self.slots.read().await.get(&id).map(|slot| slot.job.clone())
    }

    /// Applies a mutation to a job's state. Engine-only.
    pub async fn update(&self, id: Uuid, mutate: impl FnOnce(&mut Job)) {
        if let Some(slot) = self.slots.write().await.get_mut(&id) {
            mutate(&mut slot.job);
        }
    }

    /// Cancels the job's token. Returns false for unknown ids.
    pub async fn cancel(&self, id: Uuid) -> bool {
        match self.slots.read().await.get(&id) {
            Some(slot) => {
                slot.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Number of known jobs.
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    /// Whether the store holds no jobs.
    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindloop_core::JobStatus;

    #[tokio::test]
    async fn test_insert_and_snapshot() {
        let store = JobStore::new();
        let job = Job::new("a goal");
        let id = job.id;
        store.insert(job, CancellationToken::new()).await;

        let snapshot = store.get(id).await.unwrap();
        assert_eq!(snapshot.goal, "a goal");
        assert_eq!(snapshot.status, JobStatus::Pending);
        assert!(store.get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_update_visible_in_snapshot() {
        let store = JobStore::new();
        let job = Job::new("goal");
        let id = job.id;
        store.insert(job, CancellationToken::new()).await;

        store
            .update(id, |job| {
                job.status = JobStatus::InProgress;
                job.progress = 0.5;
            })
            .await;

        let snapshot = store.get(id).await.unwrap();
        assert_eq!(snapshot.status, JobStatus::InProgress);
        assert_eq!(snapshot.progress, 0.5);
    }

    #[tokio::test]
    async fn test_cancel_fires_token() {
        let store = JobStore::new();
        let job = Job::new("goal");
        let id = job.id;
        let token = CancellationToken::new();
        store.insert(job, token.clone()).await;

        assert!(!token.is_cancelled());
        assert!(store.cancel(id).await);
        assert!(token.is_cancelled());
        assert!(!store.cancel(Uuid::new_v4()).await);
    }
}
