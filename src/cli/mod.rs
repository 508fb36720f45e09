// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command line, declared with clap derive.
//!
//! ```text
//! gitlab-mirror [global options] <command>
//! sync          clone or update every selected repository
//! list          print the selected repositories
//! options       print the merged configuration
//! config-files  print the configuration files in use
//! version
//! ```

pub mod global;
pub mod sync;


use crate::cli::global::GlobalOptions;
use crate::cli::sync::{ListArgs, SyncArgs};
use clap::{Parser, Subcommand};

/// GitLab repository backup tool.
#[derive(Debug, Parser)]
#[command(
    name = "gitlab-mirror",
    author,
    version,
    about = "Mirror GitLab groups and projects into a local backup tree",
    long_about = "gitlab-mirror Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Clones every repository of a GitLab group, a single project or\n\
                  everything the account can see into <backup-dir>/<namespace>/<project>,\n\
                  and keeps existing clones up to date. Local changes are stashed\n\
                  before pulling, never discarded.",
    after_help = "CONFIGURATION:\n\n\
                  Settings are read from gitlab-mirror.toml in the current directory,\n\
                  then from every --config file, then from GITLAB_MIRROR_<SECTION>__<KEY>\n\
                  environment variables, then from --set and the dedicated flags.\n\
                  Values still missing are asked for interactively unless\n\
                  --non-interactive is given."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the configuration files in use.
    #[command(name = "config-files")]
    ConfigFiles,

    /// Clones or updates the selected repositories.
    Sync(SyncArgs),

    /// Lists the selected repositories without touching the disk.
    List(ListArgs),
}

/// Parse `std::env::args`, exiting with usage on error.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
