// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments of the `sync` and `list` commands.
//!
//! Every flag maps onto one configuration key and is applied as an override
//! on top of all other configuration sources.

use clap::Args;
use std::path::PathBuf;

use crate::config::types::{CloneTransport, RetryMode};

/// Which GitLab instance and which part of its catalog.
#[derive(Debug, Clone, Default, Args)]
pub struct TargetArgs {
    /// GitLab base URL, e.g. https://gitlab.example.com:8000
    #[arg(short = 'u', long = "url", value_name = "URL")]
    pub url: Option<String>,

    /// Mirror a group and all of its descendant groups.
    #[arg(short = 'g', long, value_name = "ID", conflicts_with_all = ["project", "all"])]
    pub group: Option<String>,

    /// Mirror a single project (numeric id or namespace/path).
    #[arg(short = 'p', long, value_name = "ID", conflicts_with = "all")]
    pub project: Option<String>,

    /// Mirror every project visible to the account.
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Account name for the password grant.
    #[arg(long, value_name = "NAME")]
    pub username: Option<String>,

    /// Pre-issued access token (skips the password grant).
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Glob on namespace/path to skip. Can be specified multiple times.
    #[arg(short = 'x', long = "exclude", value_name = "GLOB", action = clap::ArgAction::Append)]
    pub exclude: Vec<String>,
}

impl TargetArgs {
    /// `section.key=value` assignments for every flag that was given.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<String> {
        let mut overrides = Vec::new();

        if let Some(ref url) = self.url {
            overrides.push(format!("gitlab.base_url={url}"));
        }
        if let Some(ref group) = self.group {
            overrides.push(format!("sync.selector=group:{group}"));
        }
        if let Some(ref project) = self.project {
            overrides.push(format!("sync.selector=project:{project}"));
        }
        if self.all {
            overrides.push("sync.selector=all".to_string());
        }
        if let Some(ref username) = self.username {
            overrides.push(format!("gitlab.username={username}"));
        }
        if let Some(ref token) = self.token {
            overrides.push(format!("gitlab.token={token}"));
        }

        overrides
    }
}

/// Arguments of `sync`.
#[derive(Debug, Clone, Default, Args)]
pub struct SyncArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Local directory receiving the clones.
    #[arg(short = 'd', long = "backup-dir", value_name = "DIR")]
    pub backup_dir: Option<PathBuf>,

    /// Branch to check out in every repository instead of the newest one.
    #[arg(short = 'b', long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Clone over ssh or https.
    #[arg(short = 't', long, value_name = "ssh|https")]
    pub transport: Option<CloneTransport>,

    /// How retry rounds are approved: ask, auto or never.
    #[arg(short = 'r', long, value_name = "MODE")]
    pub retry: Option<RetryMode>,

    /// Number of rounds in `auto` retry mode.
    #[arg(long = "max-retries", value_name = "N")]
    pub max_retries: Option<u32>,

    /// Hide the progress bar.
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Never prompt; missing settings are errors and `ask` retries are skipped.
    #[arg(short = 'n', long = "non-interactive")]
    pub non_interactive: bool,
}

impl SyncArgs {
    /// `section.key=value` assignments for every flag that was given.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<String> {
        let mut overrides = self.target.to_config_overrides();

        if let Some(ref dir) = self.backup_dir {
            overrides.push(format!("sync.backup_root={}", dir.display()));
        }
        if let Some(ref branch) = self.branch {
            overrides.push(format!("sync.branch={branch}"));
        }
        if let Some(transport) = self.transport {
            overrides.push(format!("sync.transport={transport}"));
        }
        if let Some(retry) = self.retry {
            overrides.push(format!("sync.retry={retry}"));
        }
        if let Some(max) = self.max_retries {
            overrides.push(format!("sync.max_auto_retries={max}"));
        }
        if self.no_progress {
            overrides.push("sync.progress=false".to_string());
        }

        overrides
    }
}

/// Arguments of `list`.
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Print the descriptors as JSON.
    #[arg(long)]
    pub json: bool,

    /// Never prompt; missing settings are errors.
    #[arg(short = 'n', long = "non-interactive")]
    pub non_interactive: bool,
}
