// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! One mirror run.
//!
//! ```text
//! SyncSettings::from_config(&SyncConfig)   validated, immutable
//!        |
//!        v
//! SyncSession::new(settings, descriptors, audit, reconciler)
//!   .run()    --> one reconcile per descriptor, progress bar
//!   .retry()  --> run_retry_rounds(gate)
//!   .summary()
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use super::engine::{GitReconciler, ReconcileOptions, Reconciler};
use super::retry::{RetryGate, run_retry_rounds};
use super::store::{ActionCounts, DescriptorStore};
use crate::audit::AuditSink;
use crate::config::types::{CloneTransport, SyncConfig};
use crate::error::{ConfigError, MirrorResult};
use crate::gitlab::{RepositoryDescriptor, Selector};

/// Validated settings of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    pub backup_root: PathBuf,
    pub selector: Selector,
    pub branch: Option<String>,
    pub transport: CloneTransport,
    pub remote: String,
    pub audit_dir: PathBuf,
    pub progress: ProgressDisplay,
}

impl SyncSettings {
    /// Validate the `[sync]` section.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the backup root or selector is missing, or
    /// the selector cannot be parsed.
    pub fn from_config(config: &SyncConfig) -> MirrorResult<Self> {
        let backup_root = config
            .backup_root
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| missing("backup_root"))?;
        if config.selector.trim().is_empty() {
            return Err(missing("selector").into());
        }
        let selector = config.selector.parse::<Selector>()?;
        let remote = if config.remote.trim().is_empty() {
            "origin".to_string()
        } else {
            config.remote.trim().to_string()
        };

        Ok(Self {
            backup_root,
            selector,
            // `all` keeps each repository on its own newest branch
            branch: Some(config.branch.trim())
                .filter(|b| !b.is_empty() && !b.eq_ignore_ascii_case("all"))
                .map(str::to_string),
            transport: config.transport,
            remote,
            audit_dir: config.audit_dir.clone(),
            progress: if config.progress {
                ProgressDisplay::Bar
            } else {
                ProgressDisplay::Silent
            },
        })
    }

    /// Directory receiving audit files.
    #[must_use]
    pub fn audit_path(&self) -> PathBuf {
        self.backup_root.join(&self.audit_dir)
    }

    #[must_use]
    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions::builder()
            .backup_root(self.backup_root.clone())
            .maybe_branch(self.branch.clone())
            .transport(self.transport)
            .remote(self.remote.clone())
            .build()
    }
}

fn missing(key: &str) -> ConfigError {
    ConfigError::MissingKey {
        section: "sync".to_string(),
        key: key.to_string(),
    }
}

/// Progress display while reconciling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressDisplay {
    #[default]
    Bar,
    Silent,
}

impl ProgressDisplay {
    fn bar(self, len: usize) -> ProgressBar {
        match self {
            Self::Silent => ProgressBar::hidden(),
            Self::Bar => {
                let style = ProgressStyle::with_template(
                    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-");
                ProgressBar::new(len as u64).with_style(style)
            }
        }
    }
}

/// End-of-run totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSummary {
    pub total: usize,
    pub counts: ActionCounts,
    pub pending: usize,
}

impl std::fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "repositories:  {}", self.total)?;
        writeln!(f, "cloned:        {}", self.counts.cloned)?;
        writeln!(f, "updated:       {}", self.counts.updated)?;
        writeln!(f, "failed:        {}", self.counts.failed)?;
        write!(f, "pending retry: {}", self.pending)
    }
}

/// Owns the store, the audit sink and the reconciler of one run.
pub struct SyncSession<A: AuditSink, R: Reconciler = GitReconciler> {
    settings: SyncSettings,
    store: DescriptorStore,
    audit: A,
    reconciler: R,
}

impl<A: AuditSink> SyncSession<A, GitReconciler> {
    /// Session reconciling through git.
    #[must_use]
    pub fn new(settings: SyncSettings, descriptors: Vec<RepositoryDescriptor>, audit: A) -> Self {
        let reconciler = GitReconciler::new(settings.reconcile_options());
        Self::with_reconciler(settings, descriptors, audit, reconciler)
    }
}

impl<A: AuditSink, R: Reconciler> SyncSession<A, R> {
    #[must_use]
    pub fn with_reconciler(
        settings: SyncSettings,
        descriptors: Vec<RepositoryDescriptor>,
        audit: A,
        reconciler: R,
    ) -> Self {
        Self {
            settings,
            store: DescriptorStore::new(descriptors),
            audit,
            reconciler,
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    #[must_use]
    pub const fn store(&self) -> &DescriptorStore {
        &self.store
    }

    #[must_use]
    pub const fn audit(&self) -> &A {
        &self.audit
    }

    /// Reconcile every descriptor once, in order.
    pub fn run(&mut self) -> ActionCounts {
        let descriptors = self.store.descriptors().to_vec();
        let bar = self.settings.progress.bar(descriptors.len());

        for descriptor in &descriptors {
            bar.set_message(descriptor.path_with_namespace.clone());
            let outcome = self.reconciler.reconcile(descriptor, &mut self.audit);
            self.store.record(descriptor, &outcome);
            bar.inc(1);
        }
        bar.finish_and_clear();

        self.store.counts()
    }

    /// Run retry rounds approved by `gate`. Returns the number of rounds.
    pub fn retry(&mut self, gate: &mut dyn RetryGate) -> u32 {
        run_retry_rounds(&mut self.store, &mut self.reconciler, &mut self.audit, gate)
    }

    #[must_use]
    pub fn summary(&self) -> SyncSummary {
        SyncSummary {
            total: self.store.len(),
            counts: self.store.counts(),
            pending: self.store.pending().len(),
        }
    }
}
