// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Config-related commands and the shared loading pipeline.

use anyhow::Context;

use crate::cli::global::GlobalOptions;
use crate::config::loader::ConfigLoader;
use crate::config::{Config, DEFAULT_CONFIG_FILE, ENV_PREFIX};
use crate::error::Result;

/// Loader for the global options: default file, `--config` files, env.
#[must_use]
pub fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new();
    if !global.no_default_config {
        loader = loader.add_toml_file_optional(DEFAULT_CONFIG_FILE);
    }
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader.with_env_prefix(ENV_PREFIX)
}

/// Load the merged configuration.
///
/// `--set` assignments are applied first, then `overrides` from command
/// flags, then `exclude` when non-empty.
///
/// # Errors
///
/// Returns an error if a source cannot be read, an assignment is malformed or
/// the merged values do not match the `Config` structure.
pub fn load_config(
    global: &GlobalOptions,
    overrides: &[String],
    exclude: &[String],
) -> Result<Config> {
    let mut loader = build_config_loader(global);
    for assignment in global.options.iter().chain(overrides) {
        loader = loader.set_assignment(assignment)?;
    }
    if !exclude.is_empty() {
        loader = loader.set("sync.exclude", exclude.to_vec())?;
    }
    loader.build().context("failed to load configuration")
}

/// `options`: print the merged configuration.
pub fn run_options_command(config: &Config) {
    for line in config.format_options() {
        println!("{line}");
    }
}

/// `config-files`: print the files that were read, in precedence order.
pub fn run_config_files_command(config_files: &[String]) {
    if config_files.is_empty() {
        println!("No configuration files loaded");
    } else {
        for line in config_files {
            println!("{line}");
        }
    }
}
