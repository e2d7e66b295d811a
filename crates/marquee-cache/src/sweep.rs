use crate::cache::ResponseCache;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handle to a running background sweeper.
///
/// [`shutdown`](SweeperHandle::shutdown) cancels the task and waits for it to
/// exit. Dropping the handle without shutting down still cancels the token,
/// so the task cannot outlive its owner.
pub struct SweeperHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl<T: Send + Sync + 'static> ResponseCache<T> {
    /// Spawn the periodic sweep task on the current Tokio runtime.
    ///
    /// Every `cleanup_interval` the task removes all expired entries, which
    /// bounds memory even for keys that are never read again. The first pass
    /// runs one full period after start.
    pub fn start_sweeper(&self) -> SweeperHandle {
        let cache = self.clone();
        let token = CancellationToken::new();
        let task_token = token.clone();
        let period = self.cleanup_interval();

        let task = tokio::spawn(async move {
            tracing::info!(period_secs = period.as_secs(), "cache sweeper started");
            let first_tick = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(first_tick, period);
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = interval.tick() => {
                        let removed = cache.remove_expired();
                        if removed > 0 {
                            tracing::debug!(removed, "cache sweep removed expired entries");
                        }
                    }
                }
            }
            tracing::debug!("cache sweeper stopped");
        });

        SweeperHandle {
            token,
            task: Some(task),
        }
    }
}

impl SweeperHandle {
    /// Stop the sweeper and wait for the task to exit.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    /// Whether the background task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
