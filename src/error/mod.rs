// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error types.
//!
//! ```text
//!                      MirrorError  (<= 24 bytes, every payload boxed)
//!   Git ---------- Network -------- Config ------ Process ---- Fs ------ Other
//!   CommandFailed  HttpError        MissingKey    Executable   NotADir   Box<str>
//!   Gix(GixError)  Reqwest          InvalidValue  NotFound     IoError
//!   BranchNotFound InvalidUrl                     SpawnFailed  OutsideRoot
//!   EmptyRepository
//!   CloneFailed / CheckoutFailed
//! ```
//!
//! Library code returns [`MirrorResult`]; command handlers and `main` work in
//! `anyhow` through [`Result`]. Per-repository failures never surface as
//! `Err` from a run: the engine turns them into failed outcomes.

use thiserror::Error;

pub type Result<T> = anyhow::Result<T>;

pub type MirrorResult<T> = std::result::Result<T, MirrorError>;

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("git error: {0}")]
    Git(Box<GitError>),

    /// GitLab API or token endpoint.
    #[error("network error: {0}")]
    Network(Box<NetworkError>),

    #[error("config error: {0}")]
    Config(Box<ConfigError>),

    #[error("process error: {0}")]
    Process(Box<ProcessError>),

    /// Backup tree or audit directory.
    #[error("filesystem error: {0}")]
    Fs(Box<FsError>),

    #[error("{0}")]
    Other(Box<str>),
}

impl MirrorError {
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into().into_boxed_str())
    }
}

macro_rules! boxed_into_mirror_error {
    ($($variant:ident($error:ty)),+ $(,)?) => {$(
        impl From<$error> for MirrorError {
            fn from(err: $error) -> Self {
                Self::$variant(Box::new(err))
            }
        }
    )+};
}

boxed_into_mirror_error!(
    Git(GitError),
    Network(NetworkError),
    Config(ConfigError),
    Process(ProcessError),
    Fs(FsError),
);

/// Read-side failures of the gix backend.
#[derive(Debug, Error)]
pub enum GixError {
    #[error("failed to open repository: {0}")]
    Open(#[from] Box<gix::open::Error>),

    #[error("failed to find reference: {0}")]
    Reference(#[from] gix::reference::find::existing::Error),

    /// Reference iteration, commit decoding or status walks.
    #[error("failed to inspect {what}: {message}")]
    Inspect { what: String, message: String },
}

#[derive(Debug, Error)]
pub enum GitError {
    /// Non-zero exit of the git CLI; `message` is its trimmed stderr.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    #[error("gix error: {0}")]
    Gix(#[from] GixError),

    #[error("no branch found on remote '{remote}'")]
    BranchNotFound { remote: String },

    #[error("repository {path} is empty")]
    EmptyRepository { path: String },

    #[error("failed to clone {url}: {message}")]
    CloneFailed { url: String, message: String },

    #[error("failed to checkout {what}: {message}")]
    CheckoutFailed { what: String, message: String },
}

#[derive(Debug, Error)]
pub enum NetworkError {
    /// Only raised where a non-200 answer is fatal (the token endpoint);
    /// listing endpoints degrade to fewer results instead.
    #[error("http error {status}: {url}")]
    HttpError { status: u16, url: String },

    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum FsError {
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// A catalog path with `.` or `..` segments.
    #[error("path escapes the backup root: {0}")]
    OutsideRoot(String),

    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
