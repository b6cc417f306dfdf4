//! Memoized fold over a task's dependency graph.
//!
//! Every task reachable from the root gets exactly one shared future. A task's
//! future is created after the futures of everything it depends on, and the
//! callback receives those futures instead of their results, so it decides
//! itself when (and whether) to wait for them. Independent subtrees make
//! progress concurrently because a dependent awaits all of its direct
//! dependencies together.

use std::collections::HashMap;

use futures_util::FutureExt;
use futures_util::future::{LocalBoxFuture, Shared, join_all};
use tracing::trace;

use crate::task::{Task, TaskGraph, TaskId};

use super::types::BuildError;

/// The memoized outcome of processing one task.
pub type TaskFuture<'a> = Shared<LocalBoxFuture<'a, Result<(), BuildError>>>;

/// A dependency together with its future.
pub type DependencyFuture<'a> = (&'a Task, TaskFuture<'a>);

/// Fold `f` over the subgraph rooted at `root` and resolve to the root's result.
///
/// `f` is called once per reachable task, dependencies first, with the
/// futures of the task's direct dependencies and of its full transitive
/// dependency set. Only the direct ones are meant for gating.
pub async fn fold_with_all_dependencies<'a, F>(graph: &'a TaskGraph, root: &TaskId, mut f: F) -> Result<(), BuildError>
where
  F: FnMut(&'a Task, Vec<DependencyFuture<'a>>, Vec<DependencyFuture<'a>>) -> LocalBoxFuture<'a, Result<(), BuildError>>,
{
  let order = graph
    .post_order(root)
    .map_err(|_| BuildError::TaskNotFound(root.clone()))?;

  let mut futures: HashMap<&'a TaskId, TaskFuture<'a>> = HashMap::with_capacity(order.len());
  for task in order {
    let direct = collect(&futures, graph.dependencies(task));
    let all = collect(&futures, graph.all_dependencies(&task.id));
    trace!(task = %task.id, direct = direct.len(), all = all.len(), "scheduling");

    futures.insert(&task.id, f(task, direct, all).shared());
  }

  match futures.remove(root) {
    Some(fut) => fut.await,
    None => Err(BuildError::TaskNotFound(root.clone())),
  }
}

fn collect<'a>(
  futures: &HashMap<&'a TaskId, TaskFuture<'a>>,
  tasks: impl IntoIterator<Item = &'a Task>,
) -> Vec<DependencyFuture<'a>> {
  tasks
    .into_iter()
    .filter_map(|task| futures.get(&task.id).map(|fut| (task, fut.clone())))
    .collect()
}

/// Wait for every dependency, then report the first failure in declaration order.
///
/// Dependencies that are already running are never cancelled because a
/// sibling failed.
pub async fn wait_for_all(dependencies: &[DependencyFuture<'_>]) -> Result<(), BuildError> {
  join_all(dependencies.iter().map(|(_, fut)| fut.clone()))
    .await
    .into_iter()
    .collect()
}
