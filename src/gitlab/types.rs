// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! GitLab API payload types.
//!
//! ```text
//! raw project JSON --serde allow-list--> RepositoryDescriptor (immutable)
//! "group:42"       --FromStr-----------> Selector::Group("42")
//! oauth response   --serde-------------> Credential
//! ```

use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::types::CloneTransport;
use crate::error::ConfigError;

/// One remote repository as resolved from the catalog.
///
/// Only the fields below survive deserialization; every other attribute of
/// the API payload is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
pub struct RepositoryDescriptor {
    /// GitLab project id.
    pub id: u64,
    #[builder(into)]
    pub name: String,
    /// `group/subgroup/project`, also the path below the backup root.
    #[builder(into)]
    pub path_with_namespace: String,
    /// Absent for repositories without commits.
    #[serde(default)]
    #[builder(into)]
    pub default_branch: Option<String>,
    #[serde(default)]
    #[builder(into, default)]
    pub ssh_url_to_repo: String,
    #[serde(default)]
    #[builder(into, default)]
    pub http_url_to_repo: String,
    #[serde(default)]
    #[builder(into, default)]
    pub web_url: String,
    #[serde(default)]
    #[builder(default)]
    pub empty_repo: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_activity_at: Option<DateTime<Utc>>,
}

impl RepositoryDescriptor {
    /// Clone URL for `transport`, falling back to the other flavour when the
    /// preferred one is missing.
    #[must_use]
    pub fn clone_url(&self, transport: CloneTransport) -> Option<&str> {
        let (preferred, fallback) = match transport {
            CloneTransport::Ssh => (&self.ssh_url_to_repo, &self.http_url_to_repo),
            CloneTransport::Https => (&self.http_url_to_repo, &self.ssh_url_to_repo),
        };
        [preferred, fallback]
            .into_iter()
            .find(|url| !url.is_empty())
            .map(String::as_str)
    }

    /// Non-empty default branch.
    #[must_use]
    pub fn default_branch(&self) -> Option<&str> {
        self.default_branch.as_deref().filter(|b| !b.is_empty())
    }

    /// Working copy location below `backup_root`.
    ///
    /// `None` when `path_with_namespace` has no segments or contains `.` or
    /// `..`, which would point outside `backup_root`.
    #[must_use]
    pub fn local_path(&self, backup_root: &Path) -> Option<PathBuf> {
        let segments: Vec<_> = self
            .path_with_namespace
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        if segments.is_empty() || segments.iter().any(|s| matches!(*s, "." | "..")) {
            return None;
        }
        Some(
            segments
                .into_iter()
                .fold(backup_root.to_path_buf(), |path, segment| path.join(segment)),
        )
    }
}

/// Which part of the catalog is mirrored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Every project visible to the account.
    All,
    /// A group and all of its descendant groups.
    Group(String),
    /// A single project.
    Project(String),
}

impl Selector {
    /// Encode an id for use as a path segment (`a/b` -> `a%2Fb`).
    #[must_use]
    pub fn encode_id(id: &str) -> String {
        id.replace('/', "%2F")
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Group(id) => write!(f, "group:{id}"),
            Self::Project(id) => write!(f, "project:{id}"),
        }
    }
}

impl std::str::FromStr for Selector {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidValue {
            section: "sync".to_string(),
            key: "selector".to_string(),
            message: format!("expected 'all', 'group:<id>' or 'project:<id>', got '{s}'"),
        };

        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        let (kind, id) = s.split_once(':').ok_or_else(invalid)?;
        let id = id.trim();
        if id.is_empty() {
            return Err(invalid());
        }
        match kind.trim().to_lowercase().as_str() {
            "group" => Ok(Self::Group(id.to_string())),
            "project" => Ok(Self::Project(id.to_string())),
            _ => Err(invalid()),
        }
    }
}

/// Access token used in the `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credential {
    pub token_type: String,
    pub access_token: String,
}

impl Credential {
    #[must_use]
    pub fn new(token_type: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            token_type: token_type.into(),
            access_token: access_token.into(),
        }
    }
}

/// Entry of `/groups/{id}/descendant_groups`; only the id is used.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GroupRef {
    pub id: u64,
}
