// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Interactive prompts for settings that are still missing after loading.
//!
//! ```text
//! backup_root  Input     (sync only)
//! base_url     Input
//! username     Input     (no token configured)
//! password     Password  (username known, no token)
//! selector     Input     all | group:<id> | project:<id>
//! branch       Input     empty = newest branch; asked with the selector
//! ```

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::gitlab::Selector;

/// Which settings the running command needs.
#[derive(Debug, Clone, Copy)]
pub struct Needs {
    pub backup_root: bool,
    pub branch: bool,
}

/// True when prompting is allowed and stdin is a terminal.
#[must_use]
pub fn can_prompt(non_interactive: bool) -> bool {
    !non_interactive && std::io::stdin().is_terminal()
}

/// Ask for every required setting that is still empty.
///
/// # Errors
///
/// Returns an error if the terminal cannot be read.
pub fn fill_missing(config: &mut Config, needs: Needs) -> Result<()> {
    let theme = ColorfulTheme::default();

    if needs.backup_root && config.sync.backup_root.is_none() {
        let dir: String = Input::with_theme(&theme)
            .with_prompt("Backup directory")
            .interact_text()?;
        config.sync.backup_root = Some(PathBuf::from(dir.trim()));
    }

    if config.gitlab.base_url.is_empty() {
        config.gitlab.base_url = Input::with_theme(&theme)
            .with_prompt("GitLab URL (e.g. https://gitlab.example.com:8000)")
            .interact_text()?;
    }

    if config.gitlab.token.is_empty() {
        if config.gitlab.username.is_empty() {
            config.gitlab.username = Input::with_theme(&theme)
                .with_prompt("GitLab account name (empty for anonymous)")
                .allow_empty(true)
                .interact_text()?;
        }
        if !config.gitlab.username.is_empty() && config.gitlab.password.is_empty() {
            config.gitlab.password = Password::with_theme(&theme)
                .with_prompt("GitLab password")
                .interact()?;
        }
    }

    if config.sync.selector.is_empty() {
        config.sync.selector = Input::with_theme(&theme)
            .with_prompt("Repositories (all, group:<id> or project:<id>)")
            .validate_with(|input: &String| -> std::result::Result<(), String> {
                input
                    .parse::<Selector>()
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact_text()?;

        if needs.branch && config.sync.branch.is_empty() {
            config.sync.branch = Input::with_theme(&theme)
                .with_prompt("Branch (empty for the most recently updated one)")
                .allow_empty(true)
                .interact_text()?;
        }
    }

    Ok(())
}
