use mindloop_core::{MindloopError, MindloopResult};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Default number of simultaneous in-flight backend calls.
pub const DEFAULT_CAPACITY: usize = 5;

/// Process-wide bounded-capacity gate for backend calls.
///
/// Every caller acquires one unit before issuing a backend call; the permit
/// releases on drop, on every exit path. Constructed explicitly and passed
/// into components so tests can run with small capacities.
#[derive(Clone)]
pub struct Governor {
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl Governor {
    /// Creates a governor admitting at most `capacity` concurrent calls.
    pub fn new(capacity: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Waits for a unit and returns the permit holding it.
    pub async fn acquire(&self) -> MindloopResult<OwnedSemaphorePermit> {
        self.permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| MindloopError::Backend("Governor is closed".to_string()))
    }

    /// The configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Units currently available.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

impl Default for Governor {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
