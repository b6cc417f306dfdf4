//! Build orchestration.
//!
//! This module provides the entry points for building a task graph:
//! - [`build`] builds the root task and everything it depends on
//! - [`build_dependencies`] builds everything the root depends on, but not the root
//!
//! Both fold over the graph with [`fold_with_all_dependencies`]. Each task
//! waits for its direct dependencies, is classified by the force and
//! build-only policy, and then either skips the rebuild decision (forced) or
//! goes through it. Every build except a forced root takes a slot in the
//! run's [`TaskQueue`]; a forced root builds inline so it never waits behind
//! queued work.

pub mod fold;
pub mod queue;
pub mod types;

use std::cell::RefCell;

use futures_util::FutureExt;
use tracing::{debug, info};

use crate::build::{
  BuildDecision, BuildOptions, BuildReason, Builder, Classification, build_package, classify, decide,
};
use crate::config::Config;
use crate::task::{Task, TaskGraph, TaskId};

pub use fold::{DependencyFuture, TaskFuture, fold_with_all_dependencies, wait_for_all};
pub use queue::TaskQueue;
pub use types::{BuildError, BuildSummary, ExecuteConfig};

/// Build `root` and every task it transitively depends on.
///
/// Each task is attempted at most once. A task is built only after all of
/// its direct dependencies succeeded; the first failure that reaches the
/// root is returned.
pub async fn build<B: Builder>(
  graph: &TaskGraph,
  root: &TaskId,
  builder: &B,
  config: &Config,
  options: &ExecuteConfig,
) -> Result<BuildSummary, BuildError> {
  run(graph, root, builder, config, options, false).await
}

/// Build every task `root` transitively depends on, leaving `root` itself alone.
///
/// The root is never built, even when the force policy covers it.
pub async fn build_dependencies<B: Builder>(
  graph: &TaskGraph,
  root: &TaskId,
  builder: &B,
  config: &Config,
  options: &ExecuteConfig,
) -> Result<BuildSummary, BuildError> {
  run(graph, root, builder, config, options, true).await
}

/// State shared by every task of one run.
struct Run<'r, B> {
  root: &'r TaskId,
  builder: &'r B,
  config: &'r Config,
  options: &'r ExecuteConfig,
  queue: TaskQueue,
  summary: RefCell<BuildSummary>,
}

async fn run<B: Builder>(
  graph: &TaskGraph,
  root: &TaskId,
  builder: &B,
  config: &Config,
  options: &ExecuteConfig,
  deps_only: bool,
) -> Result<BuildSummary, BuildError> {
  let run = Run {
    root,
    builder,
    config,
    options,
    queue: TaskQueue::new(options.concurrency),
    summary: RefCell::new(BuildSummary::default()),
  };

  info!(
    root = %root,
    tasks = graph.len(),
    concurrency = run.queue.concurrency(),
    deps_only,
    "starting build"
  );

  let ctx = &run;
  fold_with_all_dependencies(graph, root, move |task, deps, all| {
    async move {
      debug!(
        task = %task.id,
        direct = deps.len(),
        transitive = all.len(),
        "waiting for dependencies"
      );
      wait_for_all(&deps).await?;

      if deps_only && task.id == *ctx.root {
        debug!(task = %task.id, "dependencies ready, not building root");
        return Ok(());
      }
      ctx.process(task).await
    }
    .boxed_local()
  })
  .await?;

  let summary = run.summary.into_inner();
  info!(built = summary.built.len(), skipped = summary.skipped.len(), "build complete");
  Ok(summary)
}

impl<B: Builder> Run<'_, B> {
  async fn process(&self, task: &Task) -> Result<(), BuildError> {
    let classification = classify(task, self.root, self.options.force, self.options.build_only);

    // Every build started here is unconditional.
    let options = BuildOptions {
      quiet: self.options.quiet,
      force: true,
      build_only: classification.build_only(),
      stderr: self.options.stderr.clone(),
    };

    let reason = match classification {
      Classification::Force { .. } if task.id == *self.root => {
        debug!(task = %task.id, reason = %BuildReason::Forced, "building root inline");
        build_package(self.builder, self.config, task, &options).await?;
        self.record_built(task);
        return Ok(());
      }
      Classification::Force { .. } => BuildReason::Forced,
      Classification::Decide { .. } => match decide(task, self.config).await {
        BuildDecision::Skip => {
          debug!(task = %task.id, "up to date");
          self.summary.borrow_mut().skipped.push(task.id.clone());
          return Ok(());
        }
        BuildDecision::Build(reason) => reason,
      },
    };

    debug!(task = %task.id, reason = %reason, "queueing build");
    self
      .queue
      .submit(|| build_package(self.builder, self.config, task, &options))
      .await?;
    self.record_built(task);
    Ok(())
  }

  fn record_built(&self, task: &Task) {
    self.summary.borrow_mut().built.push(task.id.clone());
  }
}
