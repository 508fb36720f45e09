// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Logging --> Command Dispatch
//!   Sync | List | Options | ConfigFiles | Version
//! ```

use std::process::ExitCode;

use gitlab_mirror::cli::global::GlobalOptions;
use gitlab_mirror::cli::{self, Command};
use gitlab_mirror::cmd::config::{
    build_config_loader, load_config, run_config_files_command, run_options_command,
};
use gitlab_mirror::cmd::list::run_list_command;
use gitlab_mirror::cmd::sync::run_sync_command;
use gitlab_mirror::logging::{LogConfig, LogGuard, Verbosity, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let _log_guard: LogGuard = match init_logging(&log_config(&cli.global)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli).await
}

fn log_config(global: &GlobalOptions) -> LogConfig {
    LogConfig::builder()
        .console(Verbosity::from_arg(global.log_level, Verbosity::Info))
        .maybe_file(
            global
                .file_log_level
                .and_then(|l| Verbosity::try_from(l).ok()),
        )
        .maybe_log_file(global.log_file.clone())
        .json(global.json_log)
        .build()
}

async fn dispatch_command(cli: &cli::Cli) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(Command::Options) => {
            load_config(&cli.global, &[], &[]).map(|config| run_options_command(&config))
        }
        Some(Command::ConfigFiles) => {
            let loader = build_config_loader(&cli.global);
            run_config_files_command(&loader.format_loaded_files());
            Ok(())
        }
        Some(Command::Sync(args)) => {
            let overrides = args.to_config_overrides();
            match load_config(&cli.global, &overrides, &args.target.exclude) {
                Ok(config) => run_sync_command(args, config).await,
                Err(e) => Err(e),
            }
        }
        Some(Command::List(args)) => {
            let overrides = args.target.to_config_overrides();
            match load_config(&cli.global, &overrides, &args.target.exclude) {
                Ok(config) => run_list_command(args, config).await,
                Err(e) => Err(e),
            }
        }
        None => Err(anyhow::anyhow!(
            "no command given, see `gitlab-mirror --help`"
        )),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
