//! Path configuration.
//!
//! A [`Config`] names the three roots that logical task paths are resolved
//! against. It is built once per process and shared read-only.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::consts::{APP_NAME, ENV_LOCAL_STORE, ENV_PROJECT, ENV_STORE, LOCAL_STORE_DIR};
use crate::task::{ConfigPath, PathRoot};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("cannot determine a data directory: set KEEL_STORE or HOME")]
  NoDataDir,
}

/// Explicitly requested roots, e.g. from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
  pub store: Option<PathBuf>,
  pub local_store: Option<PathBuf>,
  pub project: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  /// Global store shared across projects.
  pub store_path: PathBuf,
  /// Store local to the project, holding development and root builds.
  pub local_store_path: PathBuf,
  /// Project (sandbox) root.
  pub project_path: PathBuf,
}

impl Config {
  pub fn new(store_path: impl Into<PathBuf>, local_store_path: impl Into<PathBuf>, project_path: impl Into<PathBuf>) -> Self {
    Self {
      store_path: store_path.into(),
      local_store_path: local_store_path.into(),
      project_path: project_path.into(),
    }
  }

  /// Load the configuration for a project directory.
  ///
  /// Each root can be overridden through the environment:
  /// - `KEEL_PROJECT` replaces `project`
  /// - `KEEL_STORE` replaces the global store (default: `<data dir>/keel/store`)
  /// - `KEEL_LOCAL_STORE` replaces the local store (default: `<project>/_keel/store`)
  pub fn from_env(project: &Path) -> Result<Self, ConfigError> {
    Self::load(project, &ConfigOverrides::default())
  }

  /// Like [`Config::from_env`], with explicit values taking precedence over the environment.
  pub fn load(project: &Path, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
    let project = overrides
      .project
      .clone()
      .or_else(|| env_path(ENV_PROJECT))
      .unwrap_or_else(|| project.to_path_buf());
    let project = dunce::canonicalize(&project).unwrap_or(project);

    let store_path = match overrides.store.clone().or_else(|| env_path(ENV_STORE)) {
      Some(path) => path,
      None => data_dir().ok_or(ConfigError::NoDataDir)?.join("store"),
    };

    let local_store_path = overrides
      .local_store
      .clone()
      .or_else(|| env_path(ENV_LOCAL_STORE))
      .unwrap_or_else(|| project.join(LOCAL_STORE_DIR).join("store"));

    Ok(Self {
      store_path,
      local_store_path,
      project_path: project,
    })
  }

  pub fn root_dir(&self, root: PathRoot) -> &Path {
    match root {
      PathRoot::Store => &self.store_path,
      PathRoot::LocalStore => &self.local_store_path,
      PathRoot::Project => &self.project_path,
    }
  }

  /// Resolve a logical path to a concrete one.
  pub fn resolve(&self, path: &ConfigPath) -> PathBuf {
    path
      .segments()
      .fold(self.root_dir(path.root()).to_path_buf(), |acc, seg| acc.join(seg))
  }
}

fn env_path(var: &str) -> Option<PathBuf> {
  std::env::var_os(var).filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Per-user data directory for the application.
#[cfg(not(windows))]
fn data_dir() -> Option<PathBuf> {
  if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
    return Some(PathBuf::from(data_home).join(APP_NAME));
  }
  let home = std::env::var("HOME").ok()?;
  Some(PathBuf::from(home).join(".local").join("share").join(APP_NAME))
}

/// Per-user data directory for the application.
#[cfg(windows)]
fn data_dir() -> Option<PathBuf> {
  let local_appdata = std::env::var("LOCALAPPDATA").ok()?;
  Some(PathBuf::from(local_appdata).join(APP_NAME))
}
