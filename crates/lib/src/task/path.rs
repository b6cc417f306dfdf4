//! Logical path handles.
//!
//! Task records never carry absolute paths. Each path is expressed relative to
//! one of the configured roots and written as `%store%/...`, `%localStore%/...`
//! or `%project%/...`. [`Config::resolve`](crate::Config::resolve) turns a
//! handle into a concrete path.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The configured root a [`ConfigPath`] is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathRoot {
  /// The global store shared by every project.
  Store,
  /// The store local to the current project.
  LocalStore,
  /// The project (sandbox) root.
  Project,
}

impl PathRoot {
  const ALL: [PathRoot; 3] = [PathRoot::Store, PathRoot::LocalStore, PathRoot::Project];

  pub fn var(self) -> &'static str {
    match self {
      PathRoot::Store => "%store%",
      PathRoot::LocalStore => "%localStore%",
      PathRoot::Project => "%project%",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("path {0:?} must start with %store%, %localStore% or %project%")]
pub struct ConfigPathError(pub String);

/// A path relative to one of the configured roots.
///
/// The relative part always uses `/` as separator regardless of platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConfigPath {
  root: PathRoot,
  rel: String,
}

impl ConfigPath {
  pub fn new(root: PathRoot, rel: impl AsRef<str>) -> Self {
    Self {
      root,
      rel: rel.as_ref().trim_matches('/').to_string(),
    }
  }

  pub fn store(rel: impl AsRef<str>) -> Self {
    Self::new(PathRoot::Store, rel)
  }

  pub fn local_store(rel: impl AsRef<str>) -> Self {
    Self::new(PathRoot::LocalStore, rel)
  }

  pub fn project(rel: impl AsRef<str>) -> Self {
    Self::new(PathRoot::Project, rel)
  }

  pub fn root(&self) -> PathRoot {
    self.root
  }

  /// Path segments below the root, empty segments removed.
  pub fn segments(&self) -> impl Iterator<Item = &str> {
    self.rel.split('/').filter(|s| !s.is_empty())
  }

  /// Append a segment, producing a new handle on the same root.
  pub fn join(&self, segment: &str) -> Self {
    if self.rel.is_empty() {
      Self::new(self.root, segment)
    } else {
      Self::new(self.root, format!("{}/{}", self.rel, segment.trim_matches('/')))
    }
  }
}

impl fmt::Display for ConfigPath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.rel.is_empty() {
      write!(f, "{}", self.root.var())
    } else {
      write!(f, "{}/{}", self.root.var(), self.rel)
    }
  }
}

impl TryFrom<String> for ConfigPath {
  type Error = ConfigPathError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.as_str().parse()
  }
}

impl std::str::FromStr for ConfigPath {
  type Err = ConfigPathError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    for root in PathRoot::ALL {
      if let Some(rest) = s.strip_prefix(root.var())
        && (rest.is_empty() || rest.starts_with('/'))
      {
        return Ok(Self::new(root, rest));
      }
    }
    Err(ConfigPathError(s.to_string()))
  }
}

impl From<ConfigPath> for String {
  fn from(path: ConfigPath) -> Self {
    path.to_string()
  }
}
