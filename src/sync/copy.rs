//! Filtered recursive copy
//!
//! Copies a source tree into a destination directory, applying the manifest
//! filter to file names. Directories are always traversed so nested matches
//! are reached, and the copy merges with any pre-existing destination
//! content.

use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::manifest::{FilterPolicy, Manifest};

/// Copy `from` into `to`, keeping only files selected by the policy.
///
/// Returns the number of files copied. Existing destination files are
/// overwritten; existing directories are merged into.
pub fn copy_dir_filtered(
    from: &Path,
    to: &Path,
    manifest: &Manifest,
    policy: FilterPolicy,
) -> Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(from) {
        let entry = entry.with_context(|| format!("failed to walk {}", from.display()))?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .expect("walkdir yields paths under its root");
        if relative.as_os_str().is_empty() {
            continue;
        }
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)
                .with_context(|| format!("failed to create directory {}", target.display()))?;
        } else if entry.file_type().is_file() {
            if !policy.selects(manifest, entry.file_name()) {
                continue;
            }
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory {}", parent.display()))?;
            }
            std::fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
            copied += 1;
        }
    }

    Ok(copied)
}
