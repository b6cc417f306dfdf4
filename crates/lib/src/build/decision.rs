//! Per-task rebuild decisions.
//!
//! Decisions are made fresh on every run. The only state carried across runs
//! is the BuildInfo record written by the external builder.
//!
//! | Source type   | Install present                     | Install missing |
//! |---------------|-------------------------------------|-----------------|
//! | `Immutable`   | skip                                | build           |
//! | `Development` | build if sources beat the watermark | build           |
//! | `Root`        | build                               | build           |

use std::fmt;

use tracing::debug;

use crate::config::Config;
use crate::task::{SourceType, Task, TaskId};
use crate::util::fs::exists;
use crate::util::perf::measure;

use super::info::read_build_info;
use super::mtime::max_source_mod_time;

/// Which tasks a run forces to rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForceMode {
  /// Force only the root task.
  #[default]
  ForRoot,
  /// Never force.
  No,
  /// Force every task.
  Yes,
}

impl ForceMode {
  pub fn applies_to(self, is_root: bool) -> bool {
    match self {
      ForceMode::ForRoot => is_root,
      ForceMode::No => false,
      ForceMode::Yes => true,
    }
  }
}

/// Which tasks a run builds without installing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildOnlyMode {
  /// Build-only for the root task.
  #[default]
  ForRoot,
  /// Always build and install.
  No,
  /// Build-only for every task.
  Yes,
}

impl BuildOnlyMode {
  pub fn applies_to(self, is_root: bool) -> bool {
    match self {
      BuildOnlyMode::ForRoot => is_root,
      BuildOnlyMode::No => false,
      BuildOnlyMode::Yes => true,
    }
  }
}

/// Why a task needs building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildReason {
  /// The install path does not exist.
  NotInstalled,
  /// BuildInfo is missing, unreadable or has no source watermark.
  NoWatermark,
  /// A source file is newer than the recorded watermark.
  SourceChanged,
  /// Root packages are rebuilt on every run.
  RootPackage,
  /// The run forces this task.
  Forced,
}

impl fmt::Display for BuildReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      BuildReason::NotInstalled => "not installed",
      BuildReason::NoWatermark => "no build info",
      BuildReason::SourceChanged => "sources changed",
      BuildReason::RootPackage => "root package",
      BuildReason::Forced => "forced",
    };
    f.write_str(s)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildDecision {
  Skip,
  Build(BuildReason),
}

impl BuildDecision {
  pub fn needs_build(self) -> bool {
    matches!(self, BuildDecision::Build(_))
  }
}

/// How the orchestrator treats a task before looking at the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
  /// Build unconditionally, without consulting [`decide`].
  Force { build_only: bool },
  /// Run [`decide`] and queue the build if needed.
  Decide { build_only: bool },
}

impl Classification {
  pub fn build_only(self) -> bool {
    match self {
      Classification::Force { build_only } | Classification::Decide { build_only } => build_only,
    }
  }
}

pub fn classify(task: &Task, root: &TaskId, force: ForceMode, build_only: BuildOnlyMode) -> Classification {
  let is_root = task.id == *root;
  let build_only = build_only.applies_to(is_root);
  if force.applies_to(is_root) {
    Classification::Force { build_only }
  } else {
    Classification::Decide { build_only }
  }
}

/// Decide whether `task` needs building from its source type and on-disk state.
pub async fn decide(task: &Task, config: &Config) -> BuildDecision {
  let install = config.resolve(&task.paths.install);

  let decision = match task.source_type() {
    SourceType::Immutable => {
      if exists(&install).await {
        BuildDecision::Skip
      } else {
        BuildDecision::Build(BuildReason::NotInstalled)
      }
    }
    SourceType::Root => BuildDecision::Build(BuildReason::RootPackage),
    SourceType::Development => {
      if !exists(&install).await {
        BuildDecision::Build(BuildReason::NotInstalled)
      } else {
        let label = format!("checking mtime for {}", task.id);
        measure(&label, check_source_mod_time(task, config)).await
      }
    }
  };

  debug!(task = %task.id, decision = ?decision, "build decision");
  decision
}

async fn check_source_mod_time(task: &Task, config: &Config) -> BuildDecision {
  let info_path = config.resolve(&task.paths.build_info);
  let Some(watermark) = read_build_info(&info_path).await.and_then(|info| info.source_mod_time) else {
    return BuildDecision::Build(BuildReason::NoWatermark);
  };

  let source = config.resolve(&task.paths.source);
  match max_source_mod_time(&source).await {
    Some(current) if current <= watermark => BuildDecision::Skip,
    _ => BuildDecision::Build(BuildReason::SourceChanged),
  }
}
