// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Reconciliation engine.
//!
//! ```text
//!                      <root>/<path>/.git valid?
//!                     /                          \
//!                   no                            yes
//!                   |                              |
//!   guard empty --> mkdir parent          dirty? --> stash push -u
//!   clone --branch <default>                       |
//!   override? --> checkout                fetch <remote>
//!                   |                              |
//!                Cloned                   override | newest remote branch
//!                                                  |
//!                                         checkout (or create tracking)
//!                                         set upstream <remote>/<branch>
//!                                         pull --prune --no-rebase
//!                                                  |
//!                                               Updated
//!
//! Any step error --> Failed(ReconcileFailure { id, path, step, source })
//! Exactly one audit record per reconcile() call.
//! ```

use bon::Builder;
use chrono::Local;
use std::path::{Path, PathBuf};

use crate::audit::{AuditKind, AuditRecord, AuditSink};
use crate::config::types::CloneTransport;
use crate::error::{FsError, GitError, MirrorError};
use crate::git::{cmd, query};
use crate::gitlab::RepositoryDescriptor;

/// Branch name used in stash messages when HEAD is detached.
const DETACHED: &str = "(detached)";

/// Step of a reconciliation, reported with failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileStep {
    /// Pre-clone checks (path below the root, empty repository, clone URL).
    Guard,
    /// Creating parent directories of the working copy.
    Prepare,
    Clone,
    /// Reading working copy state.
    Inspect,
    Stash,
    Fetch,
    /// Choosing the branch to check out.
    SelectBranch,
    Checkout,
    SetUpstream,
    Pull,
}

impl std::fmt::Display for ReconcileStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Guard => "guard",
            Self::Prepare => "prepare",
            Self::Clone => "clone",
            Self::Inspect => "inspect",
            Self::Stash => "stash",
            Self::Fetch => "fetch",
            Self::SelectBranch => "select branch",
            Self::Checkout => "checkout",
            Self::SetUpstream => "set upstream",
            Self::Pull => "pull",
        };
        f.write_str(name)
    }
}

/// Why a reconciliation failed.
#[derive(Debug, thiserror::Error)]
#[error("{path_with_namespace} (#{id}): {step} failed: {source}")]
pub struct ReconcileFailure {
    pub id: u64,
    pub path_with_namespace: String,
    pub step: ReconcileStep,
    #[source]
    pub source: MirrorError,
}

/// Result of one reconciliation.
#[derive(Debug)]
pub enum ReconciliationOutcome {
    Cloned,
    Updated,
    Failed(ReconcileFailure),
}

impl ReconciliationOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

/// Immutable inputs shared by every reconciliation of a run.
#[derive(Debug, Clone, Builder)]
pub struct ReconcileOptions {
    #[builder(into)]
    pub backup_root: PathBuf,
    /// Branch checked out everywhere instead of the newest remote branch.
    #[builder(into)]
    pub branch: Option<String>,
    #[builder(default)]
    pub transport: CloneTransport,
    #[builder(into, default = "origin".to_string())]
    pub remote: String,
}

/// Something that brings a working copy in line with its remote.
pub trait Reconciler {
    /// Reconcile one descriptor. Never fails; errors become
    /// [`ReconciliationOutcome::Failed`].
    fn reconcile(
        &mut self,
        descriptor: &RepositoryDescriptor,
        audit: &mut dyn AuditSink,
    ) -> ReconciliationOutcome;
}

/// Reconciler driving the git CLI and gix.
#[derive(Debug, Clone)]
pub struct GitReconciler {
    options: ReconcileOptions,
}

impl GitReconciler {
    #[must_use]
    pub const fn new(options: ReconcileOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> &ReconcileOptions {
        &self.options
    }
}

impl Reconciler for GitReconciler {
    fn reconcile(
        &mut self,
        descriptor: &RepositoryDescriptor,
        audit: &mut dyn AuditSink,
    ) -> ReconciliationOutcome {
        reconcile(descriptor, &self.options, audit)
    }
}

type StepResult<T> = Result<T, (ReconcileStep, MirrorError)>;

/// Tag an error with the step that produced it.
trait AtStep<T> {
    fn at(self, step: ReconcileStep) -> StepResult<T>;
}

impl<T, E: Into<MirrorError>> AtStep<T> for Result<T, E> {
    fn at(self, step: ReconcileStep) -> StepResult<T> {
        self.map_err(|e| (step, e.into()))
    }
}

/// Clone or update one repository below `options.backup_root`.
///
/// Writes exactly one audit record: `Info` on success, `Exception` on failure.
pub fn reconcile(
    descriptor: &RepositoryDescriptor,
    options: &ReconcileOptions,
    audit: &mut dyn AuditSink,
) -> ReconciliationOutcome {
    let result = descriptor
        .local_path(&options.backup_root)
        .ok_or_else(|| FsError::OutsideRoot(descriptor.path_with_namespace.clone()))
        .at(ReconcileStep::Guard)
        .and_then(|path| {
            if query::is_working_copy(&path) {
                update(descriptor, &path, options).map(|branch| {
                    let detail = format!("updated branch {branch}");
                    (ReconciliationOutcome::Updated, detail)
                })
            } else {
                clone_fresh(descriptor, &path, options).map(|()| {
                    let detail = format!("cloned into {}", path.display());
                    (ReconciliationOutcome::Cloned, detail)
                })
            }
        });

    let (outcome, record) = match result {
        Ok((outcome, detail)) => {
            tracing::info!(repo = %descriptor.path_with_namespace, "{detail}");
            let payload = format!(
                "{} (#{}): {detail}",
                descriptor.path_with_namespace, descriptor.id
            );
            (outcome, AuditRecord::new(AuditKind::Info, payload))
        }
        Err((step, source)) => {
            let failure = ReconcileFailure {
                id: descriptor.id,
                path_with_namespace: descriptor.path_with_namespace.clone(),
                step,
                source,
            };
            tracing::warn!(repo = %descriptor.path_with_namespace, %step, "{}", failure.source);
            let record = AuditRecord::new(AuditKind::Exception, failure.to_string());
            (ReconciliationOutcome::Failed(failure), record)
        }
    };

    if let Err(e) = audit.record(record) {
        tracing::warn!(error = %e, "failed to write audit record");
    }
    outcome
}

/// Absent -> Cloned.
fn clone_fresh(
    descriptor: &RepositoryDescriptor,
    path: &Path,
    options: &ReconcileOptions,
) -> StepResult<()> {
    if descriptor.empty_repo {
        return Err::<(), _>(GitError::EmptyRepository {
            path: descriptor.path_with_namespace.clone(),
        })
        .at(ReconcileStep::Guard);
    }
    let url = descriptor
        .clone_url(options.transport)
        .ok_or_else(|| GitError::CloneFailed {
            url: descriptor.path_with_namespace.clone(),
            message: "catalog entry has no clone URL".to_string(),
        })
        .at(ReconcileStep::Guard)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|source| FsError::IoError {
                path: parent.display().to_string(),
                source,
            })
            .at(ReconcileStep::Prepare)?;
    }

    cmd::clone(url, path, descriptor.default_branch()).at(ReconcileStep::Clone)?;

    if let Some(branch) = options.branch.as_deref() {
        switch_branch(path, &options.remote, branch)?;
    }
    Ok(())
}

/// Present -> Updated. Returns the branch that was pulled.
fn update(
    descriptor: &RepositoryDescriptor,
    path: &Path,
    options: &ReconcileOptions,
) -> StepResult<String> {
    let remote = options.remote.as_str();

    if query::has_uncommitted_changes(path).at(ReconcileStep::Inspect)? {
        let current = query::current_branch(path).at(ReconcileStep::Inspect)?;
        let message = stash_message(current.as_deref());
        tracing::info!(repo = %descriptor.path_with_namespace, %message, "stashing local changes");
        cmd::stash_push(path, &message).at(ReconcileStep::Stash)?;
        tracing::debug!(
            repo = %descriptor.path_with_namespace,
            stashed = ?query::has_stashed_changes(path),
            "stash saved"
        );
    }

    cmd::fetch(path, remote).at(ReconcileStep::Fetch)?;

    let branch = match options.branch.as_deref() {
        Some(branch) => branch.to_string(),
        None => query::newest_remote_branch(path, remote)
            .at(ReconcileStep::SelectBranch)?
            .ok_or_else(|| GitError::BranchNotFound {
                remote: remote.to_string(),
            })
            .at(ReconcileStep::SelectBranch)?
            .name,
    };

    switch_branch(path, remote, &branch)?;
    cmd::set_upstream(path, &format!("{remote}/{branch}"), &branch)
        .at(ReconcileStep::SetUpstream)?;
    cmd::pull(path, remote, &branch).at(ReconcileStep::Pull)?;
    Ok(branch)
}

/// Check out `branch`, creating it from `<remote>/<branch>` when it has no
/// local counterpart yet.
fn switch_branch(path: &Path, remote: &str, branch: &str) -> StepResult<()> {
    if query::current_branch(path)
        .at(ReconcileStep::Inspect)?
        .is_some_and(|current| current == branch)
    {
        return Ok(());
    }
    if query::local_branch_exists(path, branch).at(ReconcileStep::Inspect)? {
        cmd::checkout(path, branch).at(ReconcileStep::Checkout)
    } else {
        cmd::checkout_tracking(path, remote, branch).at(ReconcileStep::Checkout)
    }
}

/// `branch <name> saved at <YYYY-MM-DD HH:MM:SS.ffffff>`
#[must_use]
pub fn stash_message(branch: Option<&str>) -> String {
    format!(
        "branch {} saved at {}",
        branch.unwrap_or(DETACHED),
        Local::now().format("%Y-%m-%d %H:%M:%S%.6f")
    )
}
