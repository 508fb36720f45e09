// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git command operations using shell backend.
//!
//! ```text
//! cmd.rs --> ShellBackend --> git (ssh-agent, credential helpers)
//! ```

use crate::error::MirrorResult;
use std::path::Path;

use super::backend::{GitMutation, ShellBackend};

/// Clone a repository into `dest`.
///
/// # Errors
///
/// Returns a `GitError` if the clone operation fails or the destination path is invalid.
pub fn clone(url: &str, dest: &Path, branch: Option<&str>) -> MirrorResult<()> {
    ShellBackend::clone(url, dest, branch)
}

/// Fetch from remote.
///
/// # Errors
///
/// Returns a `GitError` if the fetch operation fails.
pub fn fetch(repo_path: &Path, remote: &str) -> MirrorResult<()> {
    ShellBackend::fetch(repo_path, remote)
}

/// Checkout an existing local branch.
///
/// # Errors
///
/// Returns a `GitError` if the checkout operation fails.
pub fn checkout(repo_path: &Path, branch: &str) -> MirrorResult<()> {
    ShellBackend::checkout(repo_path, branch)
}

/// Create `branch` from `<remote>/<branch>` and check it out.
///
/// # Errors
///
/// Returns a `GitError` if the checkout operation fails.
pub fn checkout_tracking(repo_path: &Path, remote: &str, branch: &str) -> MirrorResult<()> {
    ShellBackend::checkout_tracking(repo_path, remote, branch)
}

/// Point local `branch` at `upstream`.
///
/// # Errors
///
/// Returns a `GitError` if the upstream cannot be set.
pub fn set_upstream(repo_path: &Path, upstream: &str, branch: &str) -> MirrorResult<()> {
    ShellBackend::set_upstream(repo_path, upstream, branch)
}

/// Pull without rebase, pruning stale remote-tracking branches.
///
/// # Errors
///
/// Returns a `GitError` if the pull operation fails.
pub fn pull(repo_path: &Path, remote: &str, branch: &str) -> MirrorResult<()> {
    ShellBackend::pull(repo_path, remote, branch)
}

/// Stash tracked and untracked changes.
///
/// # Errors
///
/// Returns a `GitError` if the stash operation fails.
pub fn stash_push(repo_path: &Path, message: &str) -> MirrorResult<()> {
    ShellBackend::stash_push(repo_path, message)
}
