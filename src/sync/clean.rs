//! Destination cleanup
//!
//! Removes stale content from the destination subtree before a sync. The
//! destination directory itself always survives; only its contents are
//! deleted.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::manifest::Manifest;

/// Delete the contents of `dir` without deleting `dir` itself.
///
/// With a manifest, only files whose names match a pattern are deleted, and
/// a subdirectory is removed only if its own cleanup left it empty. Without
/// one, everything goes. A non-existent directory is a no-op.
pub fn clean_destination(dir: &Path, manifest: Option<&Manifest>) -> Result<()> {
    if !dir.exists() {
        debug!("destination {} does not exist, nothing to clean", dir.display());
        return Ok(());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            clean_destination(&path, manifest)?;
            let keep = match manifest {
                // Manifest-based cleanup keeps directories that still hold
                // non-matching content.
                Some(_) => path.read_dir()?.next().is_some(),
                None => false,
            };
            if !keep {
                std::fs::remove_dir_all(&path)
                    .with_context(|| format!("failed to remove directory {}", path.display()))?;
            }
        } else {
            let delete = match manifest {
                Some(manifest) => manifest.matches(&entry.file_name()),
                None => true,
            };
            if delete {
                std::fs::remove_file(&path)
                    .with_context(|| format!("failed to remove file {}", path.display()))?;
            }
        }
    }

    Ok(())
}
