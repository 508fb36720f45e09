// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! List command implementation.

use anyhow::Context;

use super::prompt::{self, Needs};
use crate::audit::MemoryAuditSink;
use crate::cli::sync::ListArgs;
use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::gitlab::{
    CatalogResolver, ExcludeFilter, GitlabClient, RepositoryDescriptor, Selector, auth,
};

/// One line per descriptor: id, path, default branch.
#[must_use]
pub fn format_descriptors(descriptors: &[RepositoryDescriptor]) -> Vec<String> {
    let width = descriptors
        .iter()
        .map(|d| d.path_with_namespace.len())
        .max()
        .unwrap_or(0);

    descriptors
        .iter()
        .map(|d| {
            format!(
                "{:<8}  {:<width$}  {}",
                d.id,
                d.path_with_namespace,
                d.default_branch().unwrap_or("-")
            )
        })
        .collect()
}

/// Main handler for list command.
///
/// # Errors
///
/// Returns an error if the instance or selector is missing or invalid, or the
/// catalog cannot be reached.
pub async fn run_list_command(args: &ListArgs, mut config: Config) -> Result<()> {
    if prompt::can_prompt(args.non_interactive) {
        prompt::fill_missing(
            &mut config,
            Needs {
                backup_root: false,
                branch: false,
            },
        )?;
    }

    if config.sync.selector.trim().is_empty() {
        return Err(ConfigError::MissingKey {
            section: "sync".to_string(),
            key: "selector".to_string(),
        }
        .into());
    }
    let selector = config.sync.selector.parse::<Selector>()?;
    let exclude = ExcludeFilter::new(&config.sync.exclude)?;

    let client = GitlabClient::new(&config.gitlab)?;
    let credential = auth::acquire(&client, &config.gitlab).await;
    let client = client.with_credential(credential.as_ref());

    let mut audit = MemoryAuditSink::new();
    let descriptors = CatalogResolver::new(&client)
        .with_exclude(exclude)
        .resolve(&selector, &mut audit)
        .await
        .with_context(|| format!("failed to resolve {selector}"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&descriptors)?);
    } else if descriptors.is_empty() {
        println!("No repositories found");
    } else {
        for line in format_descriptors(&descriptors) {
            println!("{line}");
        }
    }
    Ok(())
}
