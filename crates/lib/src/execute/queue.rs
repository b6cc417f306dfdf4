//! Concurrency-bounded job queue.

use std::future::Future;

use tokio::sync::Semaphore;
use tracing::warn;

use super::types::BuildError;

/// Runs submitted jobs with at most `concurrency` of them in flight.
///
/// Waiting submissions are admitted in the order they first asked for a slot.
/// A failing job releases its slot like any other and does not affect jobs
/// that are running or waiting.
pub struct TaskQueue {
  semaphore: Semaphore,
  concurrency: usize,
}

impl TaskQueue {
  pub fn new(concurrency: usize) -> Self {
    let concurrency = if concurrency == 0 {
      warn!("concurrency of 0 requested, using 1");
      1
    } else {
      concurrency
    };

    Self {
      semaphore: Semaphore::new(concurrency),
      concurrency,
    }
  }

  pub fn concurrency(&self) -> usize {
    self.concurrency
  }

  /// Number of free slots right now.
  #[cfg(test)]
  pub(crate) fn available(&self) -> usize {
    self.semaphore.available_permits()
  }

  /// Wait for a slot, then run `job` to completion while holding it.
  pub async fn submit<F, Fut, T>(&self, job: F) -> Result<T, BuildError>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, BuildError>>,
  {
    let _permit = self.semaphore.acquire().await.map_err(|_| BuildError::QueueClosed)?;
    job().await
  }
}
