mod build;
mod status;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;

use keel_lib::{Config, ConfigOverrides, TaskGraph, TaskId};

pub use build::{BuildArgs, cmd_build};
pub use status::{StatusArgs, cmd_status};

/// Arguments shared by commands that operate on a task graph.
#[derive(Debug, Args)]
pub struct GraphArgs {
  /// Path to the task graph (JSON)
  pub graph: PathBuf,

  /// Root task id (default: the root recorded in the graph file)
  #[arg(long, value_name = "ID")]
  pub root: Option<String>,

  /// Global store directory (overrides KEEL_STORE)
  #[arg(long, value_name = "DIR")]
  pub store: Option<PathBuf>,

  /// Project-local store directory (overrides KEEL_LOCAL_STORE)
  #[arg(long, value_name = "DIR")]
  pub local_store: Option<PathBuf>,

  /// Project directory (overrides KEEL_PROJECT, default: current directory)
  #[arg(long, value_name = "DIR")]
  pub project: Option<PathBuf>,
}

impl GraphArgs {
  /// Load the graph, pick the root and resolve the path configuration.
  pub fn load(&self) -> Result<(TaskGraph, TaskId, Config)> {
    let graph = TaskGraph::from_file(&self.graph)
      .with_context(|| format!("Failed to load task graph {}", self.graph.display()))?;

    let root = match &self.root {
      Some(id) => TaskId::from(id.as_str()),
      None => graph
        .default_root()
        .cloned()
        .context("Task graph has no root; pass --root")?,
    };
    if !graph.contains(&root) {
      bail!("Task {} not found in {}", root, self.graph.display());
    }

    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let overrides = ConfigOverrides {
      store: self.store.clone(),
      local_store: self.local_store.clone(),
      project: self.project.clone(),
    };
    let config = Config::load(&cwd, &overrides).context("Failed to load configuration")?;

    Ok((graph, root, config))
  }
}
