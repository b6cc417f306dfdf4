//! Source tree change detection.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use tracing::warn;

use crate::consts::SKIP_TRAVERSE_DIRS;
use crate::util::fs;

/// Whether the directory walk should prune `path`.
pub fn skip_traverse(path: &Path) -> bool {
  path
    .file_name()
    .and_then(|name| name.to_str())
    .is_some_and(|name| SKIP_TRAVERSE_DIRS.contains(&name))
}

/// Latest modification time (seconds since the Unix epoch) of any file in
/// the source tree, excluding build and dependency directories.
///
/// An empty or missing tree yields `0.0`. Returns `None` only if the walk
/// itself could not complete.
pub async fn max_source_mod_time(source: &Path) -> Option<f64> {
  let source: PathBuf = source.to_path_buf();

  let walk = tokio::task::spawn_blocking(move || {
    fs::fold(&source, skip_traverse, 0.0_f64, |max, _, metadata| {
      let mtime = metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);
      if mtime > max { mtime } else { max }
    })
  });

  match walk.await {
    Ok(max) => Some(max),
    Err(e) => {
      warn!(error = %e, "source tree walk did not complete");
      None
    }
  }
}
