// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{GitQuery, GixBackend, ShellBackend};
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

#[test]
fn test_gix_backend_is_working_copy() {
    let temp = temp_dir();
    assert!(!GixBackend::is_working_copy(temp.path()));

    gix::init(temp.path()).expect("failed to init repo");
    assert!(GixBackend::is_working_copy(temp.path()));
}

#[test]
fn test_is_working_copy_ignores_parent_repository() {
    let temp = temp_dir();
    gix::init(temp.path()).expect("failed to init repo");

    let nested = temp.path().join("group").join("project");
    std::fs::create_dir_all(&nested).unwrap();
    assert!(!GixBackend::is_working_copy(&nested));
}

#[test]
fn test_is_working_copy_rejects_bogus_git_dir() {
    let temp = temp_dir();
    std::fs::create_dir_all(temp.path().join(".git")).unwrap();
    assert!(!GixBackend::is_working_copy(temp.path()));
}

#[test]
fn test_gix_has_stashed_changes_no_stash() {
    let temp = temp_dir();
    gix::init(temp.path()).expect("failed to init repo");

    let result = GixBackend::has_stashed_changes(temp.path());
    assert!(!result.unwrap());
}

#[test]
fn test_newest_remote_branch_without_remotes() {
    let temp = temp_dir();
    gix::init(temp.path()).expect("failed to init repo");

    let newest = GixBackend::newest_remote_branch(temp.path(), "origin").unwrap();
    assert!(newest.is_none());
}

#[test]
fn test_shell_backend_reports_stderr() {
    let temp = temp_dir();
    let err = ShellBackend::git_command(&["rev-parse", "--verify", "HEAD"], temp.path())
        .unwrap_err()
        .to_string();
    assert!(err.starts_with("git error: git command failed: git rev-parse --verify HEAD"));
}
