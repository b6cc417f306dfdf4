//! Persisted build metadata.
//!
//! The external builder writes a BuildInfo record next to each successful
//! build. This crate only reads it, and treats any read problem as "no
//! watermark".

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
  /// Maximum source mtime (seconds since the Unix epoch) seen by the last build.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source_mod_time: Option<f64>,

  /// Wall-clock seconds the last build took.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub time_spent: Option<f64>,
}

/// Read the BuildInfo at `path`.
///
/// Returns `None` if the file is missing, unreadable or malformed.
pub async fn read_build_info(path: &Path) -> Option<BuildInfo> {
  let content = match tokio::fs::read_to_string(path).await {
    Ok(content) => content,
    Err(e) => {
      debug!(path = ?path, error = %e, "no build info");
      return None;
    }
  };

  match serde_json::from_str(&content) {
    Ok(info) => Some(info),
    Err(e) => {
      debug!(path = ?path, error = %e, "ignoring malformed build info");
      None
    }
  }
}
