// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for gitlab-mirror.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. gitlab-mirror.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. GITLAB_MIRROR_* env vars
//! 5. --set section.key=value
//! 6. dedicated CLI flags (--backup-dir, --group, ...)
//! 7. interactive prompts (only for values still missing)
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! GITLAB_MIRROR_GITLAB__BASE_URL=https://gl  → gitlab.base_url
//! GITLAB_MIRROR_SYNC__BACKUP_ROOT=/backup    → sync.backup_root
//! GITLAB_MIRROR_SYNC__EXCLUDE=a/*,b/legacy   → sync.exclude
//! ```
//!
//! # Example
//!
//! ```toml
//! [gitlab]
//! base_url = "https://gitlab.example.com"
//! username = "backup-bot"
//!
//! [sync]
//! backup_root = "/srv/gitlab-backup"
//! selector = "group:42"
//! transport = "https"
//! exclude = ["sandbox/*"]
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

use loader::ConfigLoader;
use types::{GitlabConfig, SyncConfig};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "GITLAB_MIRROR";

/// Configuration file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "gitlab-mirror.toml";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// GitLab instance and account.
    pub gitlab: GitlabConfig,
    /// Mirror run settings.
    pub sync: SyncConfig,
}

impl Config {
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load a single TOML file on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, is not TOML or has unknown keys.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load TOML text on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is not TOML or has unknown keys.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// `key = value` lines for the `options` command, sorted by key.
    /// Password and token only appear as `[hidden]`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_gitlab_options(&mut options);
        self.format_sync_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_gitlab_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("gitlab.base_url".into(), self.gitlab.base_url.clone());
        options.insert("gitlab.api_path".into(), self.gitlab.api_path.clone());
        options.insert("gitlab.username".into(), self.gitlab.username.clone());
        if !self.gitlab.password.is_empty() {
            options.insert("gitlab.password".into(), "[hidden]".into());
        }
        if !self.gitlab.token.is_empty() {
            options.insert("gitlab.token".into(), "[hidden]".into());
        }
        options.insert("gitlab.token_type".into(), self.gitlab.token_type.clone());
        options.insert("gitlab.per_page".into(), self.gitlab.per_page.to_string());
        options.insert(
            "gitlab.timeout_secs".into(),
            self.gitlab.timeout_secs.to_string(),
        );
    }

    fn format_sync_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "sync.backup_root".into(),
            self.sync
                .backup_root
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
        options.insert("sync.selector".into(), self.sync.selector.clone());
        options.insert("sync.branch".into(), self.sync.branch.clone());
        options.insert("sync.transport".into(), self.sync.transport.to_string());
        options.insert("sync.remote".into(), self.sync.remote.clone());
        options.insert("sync.exclude".into(), self.sync.exclude.join(", "));
        options.insert(
            "sync.audit_dir".into(),
            self.sync.audit_dir.display().to_string(),
        );
        options.insert("sync.retry".into(), self.sync.retry.to_string());
        options.insert(
            "sync.max_auto_retries".into(),
            self.sync.max_auto_retries.to_string(),
        );
        options.insert("sync.progress".into(), self.sync.progress.to_string());
    }
}
