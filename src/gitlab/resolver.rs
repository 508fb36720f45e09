// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote catalog resolution.
//!
//! ```text
//! Selector::Project(id) --> GET /projects/{id}                 (200 or nothing)
//! Selector::All         --> GET /projects                      (paginated)
//! Selector::Group(id)   --> GET /groups/{id}/descendant_groups (paginated)
//!                           GET /groups/{g}/projects  for g in descendants
//!        |
//!        v
//! allow-list --> drop empty --> drop excluded --> dedupe by id --> snapshot
//! ```

use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use wax::{Glob, Program};

use super::client::GitlabClient;
use super::types::{GroupRef, RepositoryDescriptor, Selector};
use crate::audit::AuditSink;
use crate::error::{ConfigError, MirrorResult};

/// Glob patterns on `path_with_namespace` that are never mirrored.
#[derive(Debug, Default)]
pub struct ExcludeFilter {
    globs: Vec<Glob<'static>>,
}

impl ExcludeFilter {
    /// Compile `patterns`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first pattern that is not a valid glob.
    pub fn new(patterns: &[String]) -> MirrorResult<Self> {
        let globs = patterns
            .iter()
            .map(|pattern| {
                Glob::new(pattern)
                    .map(Glob::into_owned)
                    .map_err(|e| ConfigError::InvalidValue {
                        section: "sync".to_string(),
                        key: "exclude".to_string(),
                        message: format!("'{pattern}': {e}"),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { globs })
    }

    #[must_use]
    pub fn is_excluded(&self, path_with_namespace: &str) -> bool {
        self.globs.iter().any(|g| g.is_match(path_with_namespace))
    }
}

/// Turns a [`Selector`] into the flat list of repositories to mirror.
pub struct CatalogResolver<'a> {
    client: &'a GitlabClient,
    exclude: ExcludeFilter,
}

impl<'a> CatalogResolver<'a> {
    #[must_use]
    pub fn new(client: &'a GitlabClient) -> Self {
        Self {
            client,
            exclude: ExcludeFilter::default(),
        }
    }

    #[must_use]
    pub fn with_exclude(mut self, exclude: ExcludeFilter) -> Self {
        self.exclude = exclude;
        self
    }

    /// Resolve `selector` and write the result to `audit` as a snapshot.
    ///
    /// Listing endpoints that answer with a non-200 status contribute nothing.
    ///
    /// # Errors
    ///
    /// Returns a `NetworkError` on transport failure.
    pub async fn resolve(
        &self,
        selector: &Selector,
        audit: &mut dyn AuditSink,
    ) -> MirrorResult<Vec<RepositoryDescriptor>> {
        let raw = self.fetch(selector).await?;
        let descriptors = self.ingest(raw);
        tracing::info!(%selector, count = descriptors.len(), "resolved repositories");

        match serde_json::to_string_pretty(&descriptors) {
            Ok(json) => {
                if let Err(e) = audit.snapshot(&json) {
                    tracing::warn!(error = %e, "failed to write repository snapshot");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize repository snapshot"),
        }

        Ok(descriptors)
    }

    /// Ids of every descendant group of `group`, in API order.
    ///
    /// # Errors
    ///
    /// Returns a `NetworkError` on transport failure.
    pub async fn descendant_groups(&self, group: &str) -> MirrorResult<Vec<String>> {
        let path = format!("/groups/{}/descendant_groups", Selector::encode_id(group));
        let groups = self.client.get_paginated::<GroupRef>(&path, "id").await?;
        Ok(groups.into_iter().map(|g| g.id.to_string()).collect())
    }

    async fn fetch(&self, selector: &Selector) -> MirrorResult<Vec<Value>> {
        match selector {
            Selector::Project(id) => {
                let path = format!("/projects/{}", Selector::encode_id(id));
                Ok(self
                    .client
                    .get_one::<Value>(&path)
                    .await?
                    .into_iter()
                    .collect())
            }
            Selector::All => self.client.get_paginated("/projects", "id").await,
            Selector::Group(id) => {
                let groups = self.descendant_groups(id).await?;
                tracing::debug!(group = %id, groups = groups.len(), "listing group projects");

                let mut raw = Vec::new();
                for group in &groups {
                    let path = format!("/groups/{}/projects", Selector::encode_id(group));
                    raw.extend(
                        self.client
                            .get_paginated::<Value>(&path, "updated_at")
                            .await?,
                    );
                }
                Ok(raw)
            }
        }
    }

    fn ingest(&self, raw: Vec<Value>) -> Vec<RepositoryDescriptor> {
        let mut seen = HashSet::new();
        let mut descriptors = Vec::new();

        for value in raw {
            let descriptor = match serde_json::from_value::<RepositoryDescriptor>(value) {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed project payload");
                    continue;
                }
            };
            if descriptor.local_path(Path::new("")).is_none() {
                tracing::warn!(path = %descriptor.path_with_namespace, "skipping unsafe repository path");
                continue;
            }
            if descriptor.empty_repo {
                tracing::debug!(path = %descriptor.path_with_namespace, "skipping empty repository");
                continue;
            }
            if self.exclude.is_excluded(&descriptor.path_with_namespace) {
                tracing::debug!(path = %descriptor.path_with_namespace, "skipping excluded repository");
                continue;
            }
            if seen.insert(descriptor.id) {
                descriptors.push(descriptor);
            }
        }

        descriptors
    }
}
