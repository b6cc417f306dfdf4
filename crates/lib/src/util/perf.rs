//! Timing instrumentation for async work.

use std::future::Future;
use std::time::Instant;

use tracing::debug;

/// Await `fut` and record how long it took under `label`.
///
/// The output is returned untouched, whether it is a success or a failure.
pub async fn measure<F, T>(label: &str, fut: F) -> T
where
  F: Future<Output = T>,
{
  let start = Instant::now();
  let output = fut.await;
  debug!(label = %label, elapsed_ms = start.elapsed().as_millis() as u64, "measured");
  output
}
