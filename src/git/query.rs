// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Read-only questions about a working copy, answered by gix without
//! spawning git.

use crate::error::MirrorResult;
use std::path::Path;

use super::backend::{GitQuery, GixBackend, RemoteBranch};

/// True if `path` already holds a clone.
#[must_use]
pub fn is_working_copy(path: &Path) -> bool {
    GixBackend::is_working_copy(path)
}

/// Checked-out branch, `None` on a detached HEAD.
///
/// # Errors
///
/// Returns a `GitError` if the repository cannot be opened or HEAD cannot be resolved.
pub fn current_branch(path: &Path) -> MirrorResult<Option<String>> {
    GixBackend::current_branch(path)
}

/// # Errors
///
/// Returns a `GitError` if the repository cannot be opened or the lookup fails.
pub fn local_branch_exists(path: &Path, name: &str) -> MirrorResult<bool> {
    GixBackend::local_branch_exists(path, name)
}

/// Staged, unstaged or untracked changes that a pull could clobber.
///
/// # Errors
///
/// Returns a `GitError` if the repository cannot be opened or status check fails.
pub fn has_uncommitted_changes(path: &Path) -> MirrorResult<bool> {
    GixBackend::has_uncommitted_changes(path)
}

///
/// # Errors
///
/// Returns a `GitError` if the repository cannot be opened or reference lookup fails.
pub fn has_stashed_changes(path: &Path) -> MirrorResult<bool> {
    GixBackend::has_stashed_changes(path)
}

/// Remote-tracking branch with the most recent tip commit.
///
/// # Errors
///
/// Returns a `GitError` if references or commits cannot be read.
pub fn newest_remote_branch(path: &Path, remote: &str) -> MirrorResult<Option<RemoteBranch>> {
    GixBackend::newest_remote_branch(path, remote)
}
