// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Two backends behind two traits: reads go through gix, anything that talks
//! to a remote or rewrites the work tree shells out to git.

use crate::error::{GitError, GixError, MirrorResult, ProcessError};
use std::path::Path;

/// Tip of a remote-tracking branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteBranch {
    /// Remote name, e.g. `origin`.
    pub remote: String,
    /// Branch name without the remote prefix, e.g. `feature/login`.
    pub name: String,
    /// Committer time of the tip commit, seconds since the Unix epoch.
    pub committed_at: i64,
}

/// Questions about a working copy that never modify it.
pub trait GitQuery {
    /// Check if `path/.git` holds a repository.
    fn is_working_copy(path: &Path) -> bool;

    /// Short name of the checked-out branch; `None` on a detached HEAD.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository cannot be opened or HEAD cannot be resolved.
    fn current_branch(path: &Path) -> MirrorResult<Option<String>>;

    /// Check whether a local branch `refs/heads/<name>` exists.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository cannot be opened or the lookup fails.
    fn local_branch_exists(path: &Path, name: &str) -> MirrorResult<bool>;

    /// Whether the index or work tree differs from HEAD, untracked files included.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository cannot be opened or status check fails.
    fn has_uncommitted_changes(path: &Path) -> MirrorResult<bool>;

    /// Whether `refs/stash` exists.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository cannot be opened or reference lookup fails.
    fn has_stashed_changes(path: &Path) -> MirrorResult<bool>;

    /// Remote-tracking branch of `remote` whose tip was committed last.
    ///
    /// `<remote>/HEAD` is ignored. Ties go to the greatest branch name.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if references or commits cannot be read.
    fn newest_remote_branch(path: &Path, remote: &str) -> MirrorResult<Option<RemoteBranch>>;
}

/// Operations that change a working copy or talk to its remote.
///
/// They use shell git so that SSH agents, credential helpers and
/// `~/.ssh/config` behave exactly as for the operator's own git.
pub trait GitMutation {
    /// Clone a repository, checking out `branch` when given.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if git fails or `dest` is not valid UTF-8.
    fn clone(url: &str, dest: &Path, branch: Option<&str>) -> MirrorResult<()>;

    /// Fetch all refs of a remote.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the remote is unknown or unreachable.
    fn fetch(repo_path: &Path, remote: &str) -> MirrorResult<()>;

    /// Checkout an existing local branch.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the branch is missing or the work tree blocks it.
    fn checkout(repo_path: &Path, branch: &str) -> MirrorResult<()>;

    /// Create local `branch` tracking `<remote>/<branch>` and check it out.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the remote branch does not exist or checkout fails.
    fn checkout_tracking(repo_path: &Path, remote: &str, branch: &str) -> MirrorResult<()>;

    /// Set the upstream of local `branch`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the upstream does not exist.
    fn set_upstream(repo_path: &Path, upstream: &str, branch: &str) -> MirrorResult<()>;

    /// Pull `branch` from `remote` without rebasing, pruning deleted remote branches.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if git cannot fetch or merge.
    fn pull(repo_path: &Path, remote: &str, branch: &str) -> MirrorResult<()>;

    /// Stash all local changes, including untracked files, under `message`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if git refuses, e.g. without a committer identity.
    fn stash_push(repo_path: &Path, message: &str) -> MirrorResult<()>;
}

/// [`GitQuery`] over gix.
///
/// Opens the repository at the given path without walking up to parent
/// directories, so a backup root nested in another checkout is never confused
/// with one of its mirrors.
pub struct GixBackend;

impl GixBackend {
    fn open(path: &Path) -> MirrorResult<gix::Repository> {
        gix::open(path).map_err(|e| GitError::Gix(GixError::Open(Box::new(e))).into())
    }

    fn inspect_error(what: &str, message: impl std::fmt::Display) -> GitError {
        GitError::Gix(GixError::Inspect {
            what: what.to_string(),
            message: message.to_string(),
        })
    }
}

impl GitQuery for GixBackend {
    fn is_working_copy(path: &Path) -> bool {
        let git_dir = path.join(".git");
        git_dir.is_dir() && gix::open(&git_dir).is_ok()
    }

    fn current_branch(path: &Path) -> MirrorResult<Option<String>> {
        let repo = Self::open(path)?;
        let head = repo
            .head_name()
            .map_err(|e| GitError::Gix(GixError::Reference(e)))?;
        Ok(head.map(|name| name.shorten().to_string()))
    }

    fn local_branch_exists(path: &Path, name: &str) -> MirrorResult<bool> {
        let repo = Self::open(path)?;
        match repo.find_reference(format!("refs/heads/{name}").as_str()) {
            Ok(_) => Ok(true),
            Err(gix::reference::find::existing::Error::NotFound { name: _ }) => Ok(false),
            Err(e) => Err(GitError::Gix(GixError::Reference(e)).into()),
        }
    }

    fn has_uncommitted_changes(path: &Path) -> MirrorResult<bool> {
        use gix::status::UntrackedFiles;

        let repo = Self::open(path)?;

        let has_changes = repo
            .status(gix::progress::Discard)
            .map_err(|_| GitError::CommandFailed {
                command: "status".to_string(),
                message: "failed to prepare status check".to_string(),
            })?
            .untracked_files(UntrackedFiles::Files)
            .into_iter(None)
            .map_err(|_| GitError::CommandFailed {
                command: "status".to_string(),
                message: "failed to check repository status".to_string(),
            })?
            .next()
            .is_some();

        Ok(has_changes)
    }

    fn has_stashed_changes(path: &Path) -> MirrorResult<bool> {
        let repo = Self::open(path)?;

        // refs/stash exists iff there are stashed changes
        match repo.find_reference("refs/stash") {
            Ok(_) => Ok(true),
            Err(gix::reference::find::existing::Error::NotFound { name: _ }) => Ok(false),
            Err(e) => Err(GitError::Gix(GixError::Reference(e)).into()),
        }
    }

    fn newest_remote_branch(path: &Path, remote: &str) -> MirrorResult<Option<RemoteBranch>> {
        let repo = Self::open(path)?;
        let prefix = format!("{remote}/");

        let references = repo
            .references()
            .map_err(|e| Self::inspect_error("references", e))?;
        let remote_branches = references
            .remote_branches()
            .map_err(|e| Self::inspect_error("remote branches", e))?;

        let mut newest: Option<RemoteBranch> = None;
        for reference in remote_branches {
            let reference = reference.map_err(|e| Self::inspect_error("remote branches", e))?;
            let short = reference.name().shorten().to_string();
            let Some(name) = short.strip_prefix(&prefix) else {
                continue;
            };
            if name == "HEAD" {
                continue;
            }
            // Remote-tracking branches are direct references to commits.
            let Some(id) = reference.target().try_id().map(ToOwned::to_owned) else {
                continue;
            };
            let commit = repo
                .find_commit(id)
                .map_err(|e| Self::inspect_error(&short, e))?;
            let committed_at = commit
                .time()
                .map_err(|e| Self::inspect_error(&short, e))?
                .seconds;

            let candidate = RemoteBranch {
                remote: remote.to_string(),
                name: name.to_string(),
                committed_at,
            };
            let replace = newest.as_ref().is_none_or(|current| {
                (candidate.committed_at, &candidate.name) > (current.committed_at, &current.name)
            });
            if replace {
                newest = Some(candidate);
            }
        }

        Ok(newest)
    }
}

/// [`GitMutation`] over the `git` executable.
pub struct ShellBackend;

impl ShellBackend {
    /// Execute a git command. Sets `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0`
    /// so that a missing credential fails instead of blocking on a prompt.
    pub(crate) fn git_command(args: &[&str], cwd: &Path) -> MirrorResult<String> {
        use std::process::Command;

        tracing::debug!(cwd = %cwd.display(), "git {}", args.join(" "));

        let output = Command::new("git")
            .args(args)
            .current_dir(cwd)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|source| ProcessError::SpawnFailed {
                command: format!("git {}", args.join(" ")),
                source,
            })?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl GitMutation for ShellBackend {
    fn clone(url: &str, dest: &Path, branch: Option<&str>) -> MirrorResult<()> {
        let mut args = vec!["clone", "--quiet"];
        if let Some(b) = branch {
            args.extend(&["--branch", b]);
        }
        args.push(url);
        let dest_str = dest.to_str().ok_or_else(|| GitError::CloneFailed {
            url: url.to_string(),
            message: "invalid destination path".to_string(),
        })?;
        args.push(dest_str);

        let parent = dest.parent().unwrap_or_else(|| Path::new("."));
        Self::git_command(&args, parent).map_err(|e| GitError::CloneFailed {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    fn fetch(repo_path: &Path, remote: &str) -> MirrorResult<()> {
        Self::git_command(&["fetch", "--prune", "--quiet", remote], repo_path)?;
        Ok(())
    }

    fn checkout(repo_path: &Path, branch: &str) -> MirrorResult<()> {
        Self::git_command(&["checkout", "-q", branch, "--"], repo_path).map_err(|e| {
            GitError::CheckoutFailed {
                what: branch.to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(())
    }

    fn checkout_tracking(repo_path: &Path, remote: &str, branch: &str) -> MirrorResult<()> {
        let upstream = format!("{remote}/{branch}");
        Self::git_command(
            &["checkout", "-q", "-b", branch, "--track", &upstream],
            repo_path,
        )
        .map_err(|e| GitError::CheckoutFailed {
            what: upstream.clone(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    fn set_upstream(repo_path: &Path, upstream: &str, branch: &str) -> MirrorResult<()> {
        let flag = format!("--set-upstream-to={upstream}");
        Self::git_command(&["branch", "--quiet", &flag, branch], repo_path)?;
        Ok(())
    }

    fn pull(repo_path: &Path, remote: &str, branch: &str) -> MirrorResult<()> {
        Self::git_command(
            &["pull", "--prune", "--no-rebase", "--quiet", remote, branch],
            repo_path,
        )?;
        Ok(())
    }

    fn stash_push(repo_path: &Path, message: &str) -> MirrorResult<()> {
        Self::git_command(
            &[
                "stash",
                "push",
                "--include-untracked",
                "--quiet",
                "-m",
                message,
            ],
            repo_path,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
