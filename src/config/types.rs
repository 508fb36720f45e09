// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for gitlab-mirror.
//!
//! # Config Structure
//!
//! ```text
//! Config
//!   gitlab: GitlabConfig  instance URL, account, token, paging
//!   sync:   SyncConfig    backup root, selector, branch, transport, retry
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Which clone URL of a project is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloneTransport {
    #[default]
    Ssh,
    Https,
}

impl std::fmt::Display for CloneTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ssh => write!(f, "ssh"),
            Self::Https => write!(f, "https"),
        }
    }
}

impl std::str::FromStr for CloneTransport {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ssh" => Ok(Self::Ssh),
            "https" | "http" => Ok(Self::Https),
            _ => Err(ConfigError::InvalidValue {
                section: "sync".to_string(),
                key: "transport".to_string(),
                message: format!("expected 'ssh' or 'https', got '{s}'"),
            }),
        }
    }
}

/// How retry rounds over failed repositories are approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetryMode {
    /// Ask the operator before every round.
    #[default]
    Ask,
    /// Run up to `max_auto_retries` rounds without asking.
    Auto,
    /// Never retry.
    Never,
}

impl std::fmt::Display for RetryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ask => write!(f, "ask"),
            Self::Auto => write!(f, "auto"),
            Self::Never => write!(f, "never"),
        }
    }
}

impl std::str::FromStr for RetryMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ask" => Ok(Self::Ask),
            "auto" => Ok(Self::Auto),
            "never" => Ok(Self::Never),
            _ => Err(ConfigError::InvalidValue {
                section: "sync".to_string(),
                key: "retry".to_string(),
                message: format!("expected 'ask', 'auto' or 'never', got '{s}'"),
            }),
        }
    }
}

/// GitLab instance and account settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitlabConfig {
    /// Instance base URL, e.g. `https://gitlab.example.com:8000`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub base_url: String,
    /// REST API path appended to `base_url`.
    pub api_path: String,
    /// Account name for the password grant.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,
    /// Account password for the password grant.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    /// Pre-issued access token; skips the password grant when set.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub token: String,
    /// Token type used with `token` in the `Authorization` header.
    pub token_type: String,
    /// Page size for listing endpoints (GitLab caps this at 100).
    pub per_page: u32,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GitlabConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_path: "/api/v4".to_string(),
            username: String::new(),
            password: String::new(),
            token: String::new(),
            token_type: "Bearer".to_string(),
            per_page: 100,
            timeout_secs: 60,
        }
    }
}

/// Mirror run settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Local directory receiving `<path_with_namespace>` clones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_root: Option<PathBuf>,
    /// `all`, `group:<id>` or `project:<id>`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub selector: String,
    /// Branch checked out in every repository instead of the newest one.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub branch: String,
    /// Clone URL flavour.
    pub transport: CloneTransport,
    /// Remote name used for fetch, upstream and pull.
    pub remote: String,
    /// Glob patterns on `path_with_namespace` that are never mirrored.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
    /// Audit directory, relative to `backup_root`.
    pub audit_dir: PathBuf,
    /// Retry approval mode.
    pub retry: RetryMode,
    /// Upper bound on rounds in `auto` retry mode.
    pub max_auto_retries: u32,
    /// Show a progress bar while reconciling.
    pub progress: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            backup_root: None,
            selector: String::new(),
            branch: String::new(),
            transport: CloneTransport::default(),
            remote: "origin".to_string(),
            exclude: Vec::new(),
            audit_dir: PathBuf::from("tmp"),
            retry: RetryMode::default(),
            max_auto_retries: 1,
            progress: true,
        }
    }
}
