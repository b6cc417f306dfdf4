//! Filesystem helpers used by build decisions.

use std::fs::Metadata;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

/// Check whether a path exists.
///
/// Errors (permission denied, broken parents) count as "does not exist".
pub async fn exists(path: &Path) -> bool {
  tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// Fold over every non-directory entry below `root`.
///
/// `skip_traverse` is asked about each entry below the root before it is
/// visited or descended into; returning `true` prunes the whole subtree.
/// Entries that cannot be read or stat'ed are skipped. Symlinks are not
/// followed and are visited with their own metadata.
pub fn fold<A, S, V>(root: &Path, skip_traverse: S, init: A, mut visit: V) -> A
where
  S: Fn(&Path) -> bool,
  V: FnMut(A, &Path, &Metadata) -> A,
{
  let walker = WalkDir::new(root)
    .into_iter()
    .filter_entry(|e| e.depth() == 0 || !skip_traverse(e.path()));

  let mut acc = init;
  for entry in walker {
    let entry = match entry {
      Ok(entry) => entry,
      Err(e) => {
        debug!(root = ?root, error = %e, "skipping unreadable entry");
        continue;
      }
    };

    if entry.file_type().is_dir() {
      continue;
    }

    match entry.metadata() {
      Ok(metadata) => acc = visit(acc, entry.path(), &metadata),
      Err(e) => debug!(path = ?entry.path(), error = %e, "skipping entry without metadata"),
    }
  }
  acc
}
