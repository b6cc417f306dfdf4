use std::fmt;

use serde::{Deserialize, Serialize};

use super::path::ConfigPath;

/// Unique identity of a resolved package instance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl fmt::Display for TaskId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<&str> for TaskId {
  fn from(id: &str) -> Self {
    TaskId(id.to_string())
  }
}

/// Where a package's sources come from, which governs its rebuild policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceType {
  /// Built once; an existing install is trusted as-is.
  Immutable,
  /// Edited in place; rebuilt when sources are newer than the last build.
  Development,
  /// The workspace package itself; always rebuilt.
  Root,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfo {
  pub name: String,
  pub version: String,
  pub source_type: SourceType,
}

/// Logical locations of a task's install, sources and build metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPaths {
  pub install: ConfigPath,
  pub source: ConfigPath,
  pub build_info: ConfigPath,
}

impl TaskPaths {
  /// Standard store layout for a task.
  ///
  /// Immutable packages live in the global store; development and root
  /// packages live in the project-local store. Installs go under `i/<id>`,
  /// build metadata under `b/<id>.info`.
  pub fn for_task(id: &TaskId, source_type: SourceType, source: ConfigPath) -> Self {
    let base = match source_type {
      SourceType::Immutable => ConfigPath::store(""),
      SourceType::Development | SourceType::Root => ConfigPath::local_store(""),
    };
    Self {
      install: base.join("i").join(&id.0),
      source,
      build_info: base.join("b").join(&format!("{}.info", id.0)),
    }
  }
}

/// A single package build unit in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
  pub id: TaskId,
  pub package: PackageInfo,
  pub paths: TaskPaths,
  #[serde(default)]
  pub dependencies: Vec<TaskId>,
}

impl Task {
  /// Create a task with the standard store layout and no dependencies.
  pub fn new(id: &str, name: &str, version: &str, source_type: SourceType, source: ConfigPath) -> Self {
    let id = TaskId::from(id);
    let paths = TaskPaths::for_task(&id, source_type, source);
    Self {
      id,
      package: PackageInfo {
        name: name.to_string(),
        version: version.to_string(),
        source_type,
      },
      paths,
      dependencies: Vec::new(),
    }
  }

  pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<TaskId>,
  {
    self.dependencies = deps.into_iter().map(Into::into).collect();
    self
  }

  pub fn source_type(&self) -> SourceType {
    self.package.source_type
  }

  /// `name@version`, used in user-facing messages.
  pub fn label(&self) -> String {
    format!("{}@{}", self.package.name, self.package.version)
  }
}
