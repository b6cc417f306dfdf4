//! Single package build.
//!
//! Wraps a [`Builder`] invocation with notification, timing and error
//! context.

use std::future::Future;
use std::path::PathBuf;

use tracing::{error, info};

use crate::config::Config;
use crate::execute::BuildError;
use crate::task::Task;
use crate::util::perf::measure;

/// Flags passed to the builder for one task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
  /// Suppress start/complete notifications.
  pub quiet: bool,
  /// Ask the builder to ignore any cached output it may have.
  pub force: bool,
  /// Build without installing into the store.
  pub build_only: bool,
  /// Redirect the builder's stderr to this file.
  pub stderr: Option<PathBuf>,
}

/// The procedure that actually builds one package.
///
/// Implementations are expected to write the task's BuildInfo on success.
pub trait Builder {
  fn build(&self, options: &BuildOptions, config: &Config, task: &Task) -> impl Future<Output = Result<(), BuildError>>;
}

/// Build a single task.
///
/// Failures are wrapped with `building <name>@<version>` and returned.
pub async fn build_package<B: Builder>(
  builder: &B,
  config: &Config,
  task: &Task,
  options: &BuildOptions,
) -> Result<(), BuildError> {
  let context = format!("building {}", task.label());

  if !options.quiet {
    info!(task = %task.id, build_only = options.build_only, "{}", context);
  }

  let label = format!("building {}", task.id);
  if let Err(e) = measure(&label, builder.build(options, config, task)).await {
    error!(task = %task.id, error = %e, "build failed");
    return Err(e.context(context));
  }

  if !options.quiet {
    info!(task = %task.id, "built {}", task.label());
  }
  Ok(())
}
