// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem bootstrap for the backup root.

use std::path::{Path, PathBuf};

use crate::error::{FsError, MirrorResult};

/// Create `path` and its parents if missing.
///
/// # Errors
///
/// Returns `FsError::NotADirectory` if `path` exists as something else, or
/// `FsError::IoError` if it cannot be created.
pub fn ensure_dir(path: &Path) -> MirrorResult<()> {
    if path.exists() && !path.is_dir() {
        return Err(FsError::NotADirectory(path.display().to_string()).into());
    }
    std::fs::create_dir_all(path).map_err(|source| FsError::IoError {
        path: path.display().to_string(),
        source,
    })?;
    Ok(())
}

/// Absolute form of the backup root, created if missing.
///
/// Relative paths are resolved against the current directory so that log and
/// audit output name the same location git writes to.
///
/// # Errors
///
/// Returns an `FsError` if the directory cannot be created or resolved.
pub fn resolve_backup_root(path: &Path) -> MirrorResult<PathBuf> {
    ensure_dir(path)?;
    let absolute = std::fs::canonicalize(path).map_err(|source| FsError::IoError {
        path: path.display().to_string(),
        source,
    })?;
    tracing::debug!(root = %absolute.display(), "backup root ready");
    Ok(absolute)
}
