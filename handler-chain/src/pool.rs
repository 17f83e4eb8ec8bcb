//! Bounded-concurrency executor for chain executions.
//!
//! At most `max_concurrency` submitted tasks run at once. When every slot is taken,
//! [`WorkerPool::submit`] waits for one to free up instead of queueing, so the caller (the
//! dispatch loop) is slowed down and no task is ever dropped. Tasks run on the tokio runtime and
//! are never interrupted by the pool once started.

use std::future::Future;
use std::sync::Arc;

use dbot_core::{DbotError, Result};
use tokio::sync::Semaphore;
use tracing::debug;

use crate::config::DEFAULT_MAX_CONCURRENCY;

#[derive(Clone, Debug)]
pub struct WorkerPool {
    slots: Arc<Semaphore>,
    max_concurrency: usize,
}

impl WorkerPool {
    /// Creates a pool; `0` means [`DEFAULT_MAX_CONCURRENCY`].
    pub fn new(max_concurrency: usize) -> Self {
        let max_concurrency = if max_concurrency == 0 {
            DEFAULT_MAX_CONCURRENCY
        } else {
            max_concurrency.min(u32::MAX as usize).min(Semaphore::MAX_PERMITS)
        };
        Self {
            slots: Arc::new(Semaphore::new(max_concurrency)),
            max_concurrency,
        }
    }

    /// Waits for a free slot, then spawns `task`. The slot is released when the task finishes
    /// (or panics).
    pub async fn submit<F>(&self, task: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let permit = Arc::clone(&self.slots)
            .acquire_owned()
            .await
            .map_err(|_| DbotError::Cancelled)?;
        debug!(in_flight = self.in_flight(), "task submitted to worker pool");
        tokio::spawn(async move {
            let _permit = permit;
            task.await;
        });
        Ok(())
    }

    /// Number of tasks currently running.
    pub fn in_flight(&self) -> usize {
        self.max_concurrency - self.slots.available_permits()
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Waits until every running task has finished. Tasks submitted while waiting may start
    /// after this returns.
    pub async fn wait_idle(&self) {
        if let Ok(all) = self.slots.acquire_many(self.max_concurrency as u32).await {
            drop(all);
        }
    }
}
