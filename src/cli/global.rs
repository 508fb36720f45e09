// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Options accepted before any command.
//!
//! Precedence of configuration, highest first: command flags, `--set`,
//! `GITLAB_MIRROR_*` variables, `--config` files in order, then
//! `gitlab-mirror.toml` from the working directory.

use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Extra TOML file; later files win. Repeatable.
    #[arg(short = 'c', long = "config", value_name = "FILE", action = clap::ArgAction::Append)]
    pub configs: Vec<PathBuf>,

    /// Verbosity on stderr: 0 silent, 1 error, 2 warn, 3 info, 4 debug, 5 trace, 6 dump.
    #[arg(short = 'l', long = "log-level", value_name = "0-6", value_parser = clap::value_parser!(u8).range(0..=6))]
    pub log_level: Option<u8>,

    /// Verbosity of --log-file; defaults to --log-level.
    #[arg(long = "file-log-level", value_name = "0-6", value_parser = clap::value_parser!(u8).range(0..=6))]
    pub file_log_level: Option<u8>,

    /// Append diagnostics to this file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Write the log file as JSON lines.
    #[arg(long = "json-log", requires = "log_file")]
    pub json_log: bool,

    /// Override one key, e.g. 'sync.remote=upstream' or 'gitlab.per_page=50'. Repeatable.
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE", action = clap::ArgAction::Append)]
    pub options: Vec<String>,

    /// Do not load gitlab-mirror.toml from the current directory.
    #[arg(long = "no-default-config")]
    pub no_default_config: bool,
}
