//! Application-wide names and defaults.

pub const APP_NAME: &str = "keel";

/// Environment variable overriding the global store location.
pub const ENV_STORE: &str = "KEEL_STORE";

/// Environment variable overriding the project-local store location.
pub const ENV_LOCAL_STORE: &str = "KEEL_LOCAL_STORE";

/// Environment variable overriding the project root.
pub const ENV_PROJECT: &str = "KEEL_PROJECT";

/// Directory under the project root holding the project-local store.
pub const LOCAL_STORE_DIR: &str = "_keel";

/// Directory names never descended into when scanning a source tree for changes.
pub const SKIP_TRAVERSE_DIRS: &[&str] = &["node_modules", "_esy", "_release", "_build", "_install"];

/// Environment variable naming the external build program.
pub const ENV_BUILDER: &str = "KEEL_BUILDER";

/// Build program used when neither a flag nor `KEEL_BUILDER` names one.
pub const DEFAULT_BUILDER: &str = "keel-builder";
