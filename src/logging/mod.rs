// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Diagnostics for a mirror run.
//!
//! ```text
//!            -l / --log-level          --file-log-level
//!                   |                         |
//!                   v                         v
//!   stderr  <-- EnvFilter          EnvFilter --> non_blocking --> --log-file
//!   (ansi)                                        (append, text | --json-log)
//!
//!   0 silent  1 error  2 warn  3 info  4 debug  5 trace  6 dump
//! ```
//!
//! Levels 3-5 raise only this crate; reqwest, hyper and gix stay at `warn`
//! until `dump`. This is separate from the audit trail, which is written no
//! matter the verbosity.

use anyhow::Context;
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::error::{ConfigError, Result};

/// How much diagnostic output a sink receives.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Verbosity {
    Silent = 0,
    Error = 1,
    Warn = 2,
    /// One line per repository.
    #[default]
    Info = 3,
    /// Git invocations and API pages.
    Debug = 4,
    Trace = 5,
    /// Trace output of dependencies as well.
    Dump = 6,
}

impl TryFrom<u8> for Verbosity {
    type Error = ConfigError;

    fn try_from(level: u8) -> std::result::Result<Self, Self::Error> {
        Ok(match level {
            0 => Self::Silent,
            1 => Self::Error,
            2 => Self::Warn,
            3 => Self::Info,
            4 => Self::Debug,
            5 => Self::Trace,
            6 => Self::Dump,
            _ => {
                return Err(ConfigError::InvalidValue {
                    section: "log".to_string(),
                    key: "level".to_string(),
                    message: format!("expected 0-6, got {level}"),
                });
            }
        })
    }
}

impl From<Verbosity> for u8 {
    fn from(verbosity: Verbosity) -> Self {
        verbosity as Self
    }
}

impl Verbosity {
    /// Parse a level given on the command line, falling back to `default`
    /// when absent or out of range.
    #[must_use]
    pub fn from_arg(level: Option<u8>, default: Self) -> Self {
        level
            .and_then(|l| Self::try_from(l).ok())
            .unwrap_or(default)
    }

    /// `EnvFilter` directives for this level.
    #[must_use]
    pub fn directives(self) -> String {
        let own = match self {
            Self::Silent => return "off".to_string(),
            Self::Error => return "error".to_string(),
            Self::Warn => return "warn".to_string(),
            Self::Dump => return "trace".to_string(),
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        };
        format!("warn,{}={own}", env!("CARGO_CRATE_NAME"))
    }

    fn filter(self) -> EnvFilter {
        EnvFilter::new(self.directives())
    }
}

/// Where diagnostics go and how verbose each destination is.
#[derive(Debug, Clone, Default, Builder)]
pub struct LogConfig {
    #[builder(default)]
    pub console: Verbosity,
    /// Defaults to the console verbosity.
    pub file: Option<Verbosity>,
    #[builder(into)]
    pub log_file: Option<PathBuf>,
    /// Write the log file as JSON lines.
    #[builder(default)]
    pub json: bool,
}

impl LogConfig {
    #[must_use]
    pub fn file_verbosity(&self) -> Verbosity {
        self.file.unwrap_or(self.console)
    }
}

/// Flushes the log file when dropped; keep it alive until exit.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard(Option<WorkerGuard>);

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn open_log_file(path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    }
    // consecutive runs share one file
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    Ok(tracing_appender::non_blocking(file))
}

fn file_layer(writer: NonBlocking, config: &LogConfig) -> BoxedLayer {
    let filter = config.file_verbosity().filter();
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_span_events(FmtSpan::CLOSE);
    if config.json {
        layer.json().with_filter(filter).boxed()
    } else {
        layer.with_filter(filter).boxed()
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if the log file or its directory cannot be created.
pub fn init_logging(config: &LogConfig) -> Result<LogGuard> {
    let (file, guard) = match config.log_file.as_deref() {
        Some(path) => {
            let (writer, guard) = open_log_file(path)?;
            (Some(file_layer(writer, config)), Some(guard))
        }
        None => (None, None),
    };

    // stdout carries command output
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.console >= Verbosity::Debug)
        .with_filter(config.console.filter());

    tracing_subscriber::registry()
        .with(file)
        .with(console)
        .init();

    Ok(LogGuard(guard))
}
