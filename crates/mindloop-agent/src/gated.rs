use crate::backend::TextBackend;
use crate::governor::Governor;
use mindloop_core::{MindloopError, MindloopResult};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Governor-gated access to a [`TextBackend`].
///
/// Every call acquires a governor unit first, is bounded by the configured
/// timeout, and observes the caller's cancellation token both while waiting
/// for the permit and while the call is in flight. The permit is released
/// on every exit path.
pub struct GatedBackend {
    backend: Arc<dyn TextBackend>,
    governor: Governor,
    timeout: Duration,
}

impl GatedBackend {
    /// Wraps a backend with the given governor and per-call timeout.
    pub fn new(backend: Arc<dyn TextBackend>, governor: Governor, timeout: Duration) -> Self {
        Self {
            backend,
            governor,
            timeout,
        }
    }

    /// Issues one gated backend call.
    pub async fn generate(
        &self,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> MindloopResult<String> {
        if cancel.is_cancelled() {
            return Err(MindloopError::Cancelled);
        }

        let _permit = tokio::select! {
            permit = self.governor.acquire() => permit?,
            () = cancel.cancelled() => return Err(MindloopError::Cancelled),
        };
        debug!(available = self.governor.available(), "Governor unit acquired");

        tokio::select! {
            result = tokio::time::timeout(self.timeout, self.backend.generate(prompt)) => {
                match result {
                    Ok(inner) => inner,
                    Err(_) => Err(MindloopError::Backend(format!(
                        "Backend call exceeded {}s timeout",
                        self.timeout.as_secs()
                    ))),
                }
            }
            () = cancel.cancelled() => Err(MindloopError::Cancelled),
        }
    }
}
