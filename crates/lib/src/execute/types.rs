//! Types for build orchestration.
//!
//! This module defines the error type shared by every stage of a run, the
//! per-run configuration, and the summary returned on success.

use std::path::PathBuf;

use thiserror::Error;

use crate::build::{BuildOnlyMode, ForceMode};
use crate::task::TaskId;

/// Errors that can occur while orchestrating builds.
///
/// Cloneable so that a single failure can be handed to every task that
/// depends on the one that failed.
#[derive(Debug, Clone, Error)]
pub enum BuildError {
  /// An error annotated with what was being done, e.g. `building zlib@1.2.11`.
  #[error("{context}: {source}")]
  Context { context: String, source: Box<BuildError> },

  /// The builder process exited unsuccessfully.
  #[error("build command failed with exit code {code:?}: {cmd}")]
  CmdFailed { cmd: String, code: Option<i32> },

  /// The builder process could not be started.
  #[error("failed to spawn {cmd}: {message}")]
  Spawn { cmd: String, message: String },

  /// The task could not be handed to the builder.
  #[error("failed to write build plan for {task}: {message}")]
  Plan { task: TaskId, message: String },

  /// I/O error outside of the builder process.
  #[error("io error: {message}")]
  Io { message: String },

  /// The requested root is not part of the graph.
  #[error("task not found: {0}")]
  TaskNotFound(TaskId),

  /// The task queue stopped handing out slots.
  #[error("task queue closed")]
  QueueClosed,
}

impl BuildError {
  /// Wrap this error with a description of the operation that failed.
  pub fn context(self, context: impl Into<String>) -> Self {
    BuildError::Context {
      context: context.into(),
      source: Box::new(self),
    }
  }

  /// The innermost error, with all context layers removed.
  pub fn root_cause(&self) -> &BuildError {
    match self {
      BuildError::Context { source, .. } => source.root_cause(),
      other => other,
    }
  }
}

impl From<std::io::Error> for BuildError {
  fn from(e: std::io::Error) -> Self {
    BuildError::Io { message: e.to_string() }
  }
}

/// Configuration for one orchestration run.
#[derive(Debug, Clone)]
pub struct ExecuteConfig {
  /// Maximum number of builds running at once.
  pub concurrency: usize,

  /// Which tasks skip the rebuild decision and build unconditionally.
  pub force: ForceMode,

  /// Which tasks are built without being installed.
  pub build_only: BuildOnlyMode,

  /// Suppress per-build start/complete notifications.
  pub quiet: bool,

  /// Redirect builder stderr to this file.
  pub stderr: Option<PathBuf>,
}

impl Default for ExecuteConfig {
  fn default() -> Self {
    Self {
      concurrency: num_cpus(),
      force: ForceMode::default(),
      build_only: BuildOnlyMode::default(),
      quiet: false,
      stderr: None,
    }
  }
}

/// Get the number of CPUs for default concurrency.
fn num_cpus() -> usize {
  std::thread::available_parallelism().map(|p| p.get()).unwrap_or(4)
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
  /// Tasks that were built, in completion order.
  pub built: Vec<TaskId>,

  /// Tasks whose existing install was reused.
  pub skipped: Vec<TaskId>,
}

impl BuildSummary {
  pub fn was_built(&self, id: &TaskId) -> bool {
    self.built.contains(id)
  }

  pub fn total(&self) -> usize {
    self.built.len() + self.skipped.len()
  }
}
