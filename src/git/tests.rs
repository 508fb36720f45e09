// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::git::cmd::{checkout, checkout_tracking, clone, fetch, pull, stash_push};
use crate::git::query::{
    current_branch, has_stashed_changes, has_uncommitted_changes, is_working_copy,
    local_branch_exists, newest_remote_branch,
};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

/// Run git with a fixed identity, optionally pinning the commit date.
fn run_git_at(args: &[&str], cwd: &Path, date: Option<&str>) -> String {
    let mut command = Command::new("git");
    command
        .args(args)
        .current_dir(cwd)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@test.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@test.com");
    if let Some(date) = date {
        command
            .env("GIT_AUTHOR_DATE", date)
            .env("GIT_COMMITTER_DATE", date);
    }
    let output = command.output().expect("failed to run git");
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn run_git(args: &[&str], cwd: &Path) -> String {
    run_git_at(args, cwd, None)
}

/// Repository on `main` with one commit and a committer identity.
fn init_repo_with_commit(path: &Path) {
    std::fs::create_dir_all(path).unwrap();
    run_git(&["init", "-q"], path);
    run_git(&["symbolic-ref", "HEAD", "refs/heads/main"], path);
    run_git(&["config", "user.email", "test@test.com"], path);
    run_git(&["config", "user.name", "Test"], path);
    std::fs::write(path.join("README.md"), "# mirror\n").unwrap();
    run_git(&["add", "README.md"], path);
    run_git_at(
        &["commit", "-q", "-m", "initial"],
        path,
        Some("2024-01-01T00:00:00Z"),
    );
}

/// Upstream with `main`, an older `stale` branch and a newer `feature/login`.
fn upstream_with_branches(root: &Path) -> std::path::PathBuf {
    let upstream = root.join("upstream");
    init_repo_with_commit(&upstream);

    run_git(&["checkout", "-q", "-b", "stale", "main"], &upstream);
    std::fs::write(upstream.join("stale.txt"), "old\n").unwrap();
    run_git(&["add", "stale.txt"], &upstream);
    run_git_at(
        &["commit", "-q", "-m", "stale"],
        &upstream,
        Some("2023-06-01T00:00:00Z"),
    );

    run_git(&["checkout", "-q", "-b", "feature/login", "main"], &upstream);
    std::fs::write(upstream.join("login.txt"), "new\n").unwrap();
    run_git(&["add", "login.txt"], &upstream);
    run_git_at(
        &["commit", "-q", "-m", "login"],
        &upstream,
        Some("2025-03-01T00:00:00Z"),
    );

    run_git(&["checkout", "-q", "main"], &upstream);
    upstream
}

fn configure_identity(path: &Path) {
    run_git(&["config", "user.email", "test@test.com"], path);
    run_git(&["config", "user.name", "Test"], path);
}

#[test]
fn test_current_branch_and_detached_head() {
    let temp = temp_dir();
    let repo = temp.path().join("repo");
    init_repo_with_commit(&repo);

    assert_eq!(current_branch(&repo).unwrap().as_deref(), Some("main"));

    run_git(&["checkout", "-q", "--detach"], &repo);
    assert_eq!(current_branch(&repo).unwrap(), None);
}

#[test]
fn test_local_branch_exists() {
    let temp = temp_dir();
    let repo = temp.path().join("repo");
    init_repo_with_commit(&repo);
    run_git(&["branch", "develop"], &repo);

    assert!(local_branch_exists(&repo, "main").unwrap());
    assert!(local_branch_exists(&repo, "develop").unwrap());
    assert!(!local_branch_exists(&repo, "release").unwrap());
}

#[test]
fn test_stash_push_cleans_work_tree() {
    let temp = temp_dir();
    let repo = temp.path().join("repo");
    init_repo_with_commit(&repo);

    assert!(!has_uncommitted_changes(&repo).unwrap());
    std::fs::write(repo.join("README.md"), "# edited\n").unwrap();
    std::fs::write(repo.join("scratch.txt"), "untracked\n").unwrap();
    assert!(has_uncommitted_changes(&repo).unwrap());
    assert!(!has_stashed_changes(&repo).unwrap());

    stash_push(&repo, "branch main saved at 2026-01-01 00:00:00.000000").unwrap();

    assert!(!has_uncommitted_changes(&repo).unwrap());
    assert!(has_stashed_changes(&repo).unwrap());
    assert!(!repo.join("scratch.txt").exists());
    let list = run_git(&["stash", "list"], &repo);
    assert!(list.contains("branch main saved at 2026-01-01"));
}

#[test]
fn test_newest_remote_branch_picks_latest_commit() {
    let temp = temp_dir();
    let upstream = upstream_with_branches(temp.path());
    let mirror = temp.path().join("mirror");

    clone(upstream.to_str().unwrap(), &mirror, None).unwrap();
    assert!(is_working_copy(&mirror));

    let newest = newest_remote_branch(&mirror, "origin").unwrap().unwrap();
    assert_eq!(newest.name, "feature/login");
    assert_eq!(newest.remote, "origin");
    assert!(newest.committed_at > 0);

    assert!(newest_remote_branch(&mirror, "backup").unwrap().is_none());
}

#[test]
fn test_clone_with_branch() {
    let temp = temp_dir();
    let upstream = upstream_with_branches(temp.path());
    let mirror = temp.path().join("group").join("mirror");
    std::fs::create_dir_all(mirror.parent().unwrap()).unwrap();

    clone(upstream.to_str().unwrap(), &mirror, Some("stale")).unwrap();
    assert_eq!(current_branch(&mirror).unwrap().as_deref(), Some("stale"));
    assert!(mirror.join("stale.txt").exists());
}

#[test]
fn test_clone_missing_source_fails() {
    let temp = temp_dir();
    let missing = temp.path().join("does-not-exist");
    let err = clone(missing.to_str().unwrap(), &temp.path().join("dest"), None).unwrap_err();
    assert!(err.to_string().contains("failed to clone"));
}

#[test]
fn test_checkout_tracking_then_checkout() {
    let temp = temp_dir();
    let upstream = upstream_with_branches(temp.path());
    let mirror = temp.path().join("mirror");
    clone(upstream.to_str().unwrap(), &mirror, None).unwrap();

    assert!(!local_branch_exists(&mirror, "feature/login").unwrap());
    checkout_tracking(&mirror, "origin", "feature/login").unwrap();
    assert_eq!(
        current_branch(&mirror).unwrap().as_deref(),
        Some("feature/login")
    );

    checkout(&mirror, "main").unwrap();
    assert_eq!(current_branch(&mirror).unwrap().as_deref(), Some("main"));

    let err = checkout(&mirror, "nope").unwrap_err();
    assert!(err.to_string().contains("failed to checkout nope"));
}

#[test]
fn test_fetch_and_pull_bring_new_commits() {
    let temp = temp_dir();
    let upstream = temp.path().join("upstream");
    init_repo_with_commit(&upstream);
    let mirror = temp.path().join("mirror");
    clone(upstream.to_str().unwrap(), &mirror, None).unwrap();
    configure_identity(&mirror);

    std::fs::write(upstream.join("CHANGELOG.md"), "v2\n").unwrap();
    run_git(&["add", "CHANGELOG.md"], &upstream);
    run_git(&["commit", "-q", "-m", "v2"], &upstream);

    fetch(&mirror, "origin").unwrap();
    pull(&mirror, "origin", "main").unwrap();
    assert!(mirror.join("CHANGELOG.md").exists());
}

#[test]
fn test_fetch_unknown_remote_fails() {
    let temp = temp_dir();
    let repo = temp.path().join("repo");
    init_repo_with_commit(&repo);

    let err = fetch(&repo, "origin").unwrap_err();
    assert!(err.to_string().contains("git fetch --prune --quiet origin"));
}
