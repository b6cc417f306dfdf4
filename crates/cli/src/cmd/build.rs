//! Implementation of the `keel build` command.
//!
//! Loads a task graph and builds the root task (or only its dependencies)
//! through an external build program, rebuilding only what is out of date.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tracing::debug;

use keel_lib::build::{BuildOnlyMode, CommandBuilder, ForceMode};
use keel_lib::consts::{DEFAULT_BUILDER, ENV_BUILDER};
use keel_lib::execute::{self, ExecuteConfig};

use super::GraphArgs;
use crate::output::{format_duration, print_info, print_stat, print_success};

/// Which tasks a policy flag applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scope {
  /// Only the root task
  Root,
  /// No task
  None,
  /// Every task
  All,
}

impl From<Scope> for ForceMode {
  fn from(scope: Scope) -> Self {
    match scope {
      Scope::Root => ForceMode::ForRoot,
      Scope::None => ForceMode::No,
      Scope::All => ForceMode::Yes,
    }
  }
}

impl From<Scope> for BuildOnlyMode {
  fn from(scope: Scope) -> Self {
    match scope {
      Scope::Root => BuildOnlyMode::ForRoot,
      Scope::None => BuildOnlyMode::No,
      Scope::All => BuildOnlyMode::Yes,
    }
  }
}

#[derive(Debug, Args)]
pub struct BuildArgs {
  #[command(flatten)]
  pub graph: GraphArgs,

  /// Maximum number of concurrent builds (default: number of CPUs)
  #[arg(short, long, value_name = "N")]
  pub jobs: Option<usize>,

  /// Tasks rebuilt unconditionally
  #[arg(long, value_enum, default_value = "root")]
  pub force: Scope,

  /// Tasks built without being installed
  #[arg(long, value_enum, default_value = "root")]
  pub build_only: Scope,

  /// Build the root's dependencies but not the root itself
  #[arg(long)]
  pub deps_only: bool,

  /// Suppress per-package notifications
  #[arg(short, long)]
  pub quiet: bool,

  /// Build program (default: $KEEL_BUILDER, then keel-builder)
  #[arg(long, value_name = "PATH")]
  pub builder: Option<PathBuf>,

  /// Argument passed to the build program ahead of its subcommand (repeatable)
  #[arg(long = "builder-arg", value_name = "ARG", allow_hyphen_values = true)]
  pub builder_args: Vec<String>,

  /// Append the build program's stderr to this file
  #[arg(long, value_name = "FILE")]
  pub stderr: Option<PathBuf>,
}

impl BuildArgs {
  fn builder(&self) -> CommandBuilder {
    let program = self
      .builder
      .clone()
      .or_else(|| std::env::var_os(ENV_BUILDER).map(PathBuf::from))
      .unwrap_or_else(|| PathBuf::from(DEFAULT_BUILDER));

    self
      .builder_args
      .iter()
      .fold(CommandBuilder::new(program), |builder, arg| builder.arg(arg))
  }

  fn execute_config(&self) -> ExecuteConfig {
    let mut config = ExecuteConfig {
      force: self.force.into(),
      build_only: self.build_only.into(),
      quiet: self.quiet,
      stderr: self.stderr.clone(),
      ..Default::default()
    };
    if let Some(jobs) = self.jobs {
      config.concurrency = jobs;
    }
    config
  }
}

/// Execute the build command.
pub fn cmd_build(args: BuildArgs) -> Result<()> {
  let (graph, root, config) = args.graph.load()?;
  let builder = args.builder();
  let options = args.execute_config();

  debug!(
    program = %builder.program().display(),
    store = %config.store_path.display(),
    local_store = %config.local_store_path.display(),
    project = %config.project_path.display(),
    "configuration"
  );

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let start = Instant::now();

  let summary = if args.deps_only {
    rt.block_on(execute::build_dependencies(&graph, &root, &builder, &config, &options))
      .with_context(|| format!("Failed to build dependencies of {}", root))?
  } else {
    rt.block_on(execute::build(&graph, &root, &builder, &config, &options))
      .with_context(|| format!("Failed to build {}", root))?
  };

  let elapsed = format_duration(start.elapsed());
  if args.deps_only {
    print_success(&format!("Dependencies of {} ready in {}", root, elapsed));
  } else {
    print_success(&format!("Built {} in {}", root, elapsed));
  }
  print_stat("Built", &summary.built.len().to_string());
  print_stat("Up to date", &summary.skipped.len().to_string());

  if summary.total() == 0 {
    print_info("Nothing to do");
  }

  Ok(())
}
