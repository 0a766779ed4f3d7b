//! Project-root discovery.
//!
//! The checker runs with its working directory set to the project root so
//! per-project configuration (pyproject.toml, mypy.ini, ...) applies. The
//! root is the nearest ancestor of the file that contains a marker file,
//! falling back to the file's own directory.

use std::path::{Path, PathBuf};

/// Find the working directory for checking `file`.
///
/// Walks from the file's parent toward the filesystem root and returns the
/// first directory containing one of `markers`. A directory entry with a
/// marker's name does not count; the marker must be a file.
///
/// Returns `None` when `file` has no parent directory, which is how an
/// unsaved or otherwise pathless buffer presents. Such a buffer is not
/// checkable.
#[must_use]
pub fn discover_project_root(file: &Path, markers: &[String]) -> Option<PathBuf> {
    let parent = file.parent()?;
    if parent.as_os_str().is_empty() {
        return None;
    }
    for dir in parent.ancestors() {
        if markers.iter().any(|marker| dir.join(marker).is_file()) {
            return Some(dir.to_path_buf());
        }
    }
    Some(parent.to_path_buf())
}
