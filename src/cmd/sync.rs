// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `sync` command.
//!
//! ```text
//! which git --> prompts --> SyncSettings --> backup root
//!   --> credential --> resolve (snapshot) --> SyncSession::run
//!   --> summary --> retry rounds (gate) --> summary
//! ```

use anyhow::Context;

use super::prompt::{self, Needs};
use crate::audit::FileAuditSink;
use crate::cli::sync::SyncArgs;
use crate::config::Config;
use crate::config::types::RetryMode;
use crate::error::{ProcessError, Result};
use crate::gitlab::{CatalogResolver, ExcludeFilter, GitlabClient, auth};
use crate::sync::{AutoGate, NeverGate, PromptGate, RetryGate, SyncSession, SyncSettings};
use crate::utility::fs::resolve_backup_root;

/// Make sure the git executable is available.
///
/// # Errors
///
/// Returns `ProcessError::ExecutableNotFound` if `git` is not in PATH.
pub fn require_git() -> Result<()> {
    let git = which::which("git").map_err(|_| ProcessError::ExecutableNotFound {
        name: "git".to_string(),
    })?;
    tracing::debug!(git = %git.display(), "found git");
    Ok(())
}

/// Gate matching the configured retry mode.
#[must_use]
pub fn retry_gate(
    mode: RetryMode,
    max_auto_retries: u32,
    interactive: bool,
) -> Box<dyn RetryGate> {
    match mode {
        RetryMode::Ask if interactive => Box::new(PromptGate),
        RetryMode::Auto => Box::new(AutoGate::new(max_auto_retries)),
        RetryMode::Ask | RetryMode::Never => Box::new(NeverGate),
    }
}

/// Main handler for the sync command.
///
/// # Errors
///
/// Returns an error if settings are missing or invalid, git is not installed,
/// the backup root cannot be created, catalog resolution fails at the
/// transport level, or repositories are still failing after the retry rounds.
pub async fn run_sync_command(args: &SyncArgs, mut config: Config) -> Result<()> {
    require_git()?;

    let interactive = prompt::can_prompt(args.non_interactive);
    if interactive {
        prompt::fill_missing(
            &mut config,
            Needs {
                backup_root: true,
                branch: true,
            },
        )?;
    }

    let mut settings = SyncSettings::from_config(&config.sync)?;
    let exclude = ExcludeFilter::new(&config.sync.exclude)?;
    settings.backup_root = resolve_backup_root(&settings.backup_root)
        .context("failed to prepare backup directory")?;

    let client = GitlabClient::new(&config.gitlab)?;
    let credential = auth::acquire(&client, &config.gitlab).await;
    let client = client.with_credential(credential.as_ref());

    let mut audit = FileAuditSink::new(settings.audit_path());
    let descriptors = CatalogResolver::new(&client)
        .with_exclude(exclude)
        .resolve(&settings.selector, &mut audit)
        .await
        .with_context(|| format!("failed to resolve {}", settings.selector))?;

    tracing::info!(
        root = %settings.backup_root.display(),
        count = descriptors.len(),
        "mirroring repositories"
    );
    let mut session = SyncSession::new(settings, descriptors, audit);
    session.run();
    println!("{}", session.summary());

    let mut gate = retry_gate(config.sync.retry, config.sync.max_auto_retries, interactive);
    if session.retry(gate.as_mut()) > 0 {
        println!("\nafter retry:\n{}", session.summary());
    }

    let pending = session.summary().pending;
    if pending > 0 {
        anyhow::bail!(
            "{pending} repositories could not be mirrored, see {}",
            session.audit().log_path().display()
        );
    }
    Ok(())
}
