// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Layered configuration loading.
//!
//! Sources are recorded in the order they are added and only read by
//! [`ConfigLoader::build`]; later sources win, overrides win over everything.

use config::{Environment, File, FileFormat, Value};
use std::path::{Path, PathBuf};

use super::Config;
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone)]
enum Source {
    File { path: PathBuf, required: bool },
    Inline(String),
}

impl Source {
    /// Label and path for `config-files`; `None` for optional files that are absent.
    fn describe(&self) -> Option<(&'static str, PathBuf)> {
        match self {
            Self::File {
                path,
                required: true,
            } => Some(("file", path.clone())),
            Self::File {
                path,
                required: false,
            } => path.exists().then(|| ("optional", path.clone())),
            Self::Inline(_) => Some(("string", PathBuf::from("<string>"))),
        }
    }
}

/// Collects TOML files, inline TOML, environment and overrides.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    sources: Vec<Source>,
    env_prefix: Option<String>,
    overrides: Vec<(String, Value)>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a TOML file that must exist when [`build`](Self::build) runs.
    #[must_use]
    pub fn add_toml_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources.push(Source::File {
            path: path.as_ref().to_path_buf(),
            required: true,
        });
        self
    }

    /// Add a TOML file that is skipped when absent.
    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources.push(Source::File {
            path: path.as_ref().to_path_buf(),
            required: false,
        });
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        self.sources.push(Source::Inline(content.to_string()));
        self
    }

    /// Read `<PREFIX>_<SECTION>__<KEY>` variables, e.g.
    /// `GITLAB_MIRROR_SYNC__BACKUP_ROOT`. `sync.exclude` is split on commas.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Override `key` (dotted path) regardless of every other source.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is empty.
    pub fn set<T: Into<Value>>(mut self, key: &str, value: T) -> Result<Self> {
        if key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                section: "cli".to_string(),
                key: "--set".to_string(),
                message: "empty key".to_string(),
            }
            .into());
        }
        self.overrides.push((key.trim().to_string(), value.into()));
        Ok(self)
    }

    /// Apply a `section.key=value` assignment as given to `--set`.
    ///
    /// # Errors
    ///
    /// Returns an error if the assignment has no `=` or an empty key.
    pub fn set_assignment(self, assignment: &str) -> Result<Self> {
        let Some((key, value)) = assignment
            .split_once('=')
            .filter(|(key, _)| !key.trim().is_empty())
        else {
            return Err(ConfigError::InvalidValue {
                section: "cli".to_string(),
                key: "--set".to_string(),
                message: format!("expected 'section.key=value', got '{assignment}'"),
            }
            .into());
        };
        self.set(key, value.trim())
    }

    /// Read every source and deserialize the merged result.
    ///
    /// # Errors
    ///
    /// Returns an error if a required file is missing, a source is not valid
    /// TOML, an environment value cannot be parsed, or the merged values do
    /// not match [`Config`].
    pub fn build(self) -> Result<Config> {
        let mut builder = config::Config::builder();

        for source in self.sources {
            builder = match source {
                Source::File { path, required } => builder
                    .add_source(File::from(path).format(FileFormat::Toml).required(required)),
                Source::Inline(content) => {
                    builder.add_source(File::from_str(&content, FileFormat::Toml))
                }
            };
        }

        if let Some(prefix) = &self.env_prefix {
            builder = builder.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("sync.exclude")
                    .try_parsing(true),
            );
        }

        for (key, value) in self.overrides {
            builder = builder.set_override(key, value)?;
        }

        Ok(builder.build()?.try_deserialize::<Config>()?)
    }

    /// Sources that will be read, as `(kind, path)`.
    #[must_use]
    pub fn loaded_files(&self) -> Vec<(String, PathBuf)> {
        self.sources
            .iter()
            .filter_map(Source::describe)
            .map(|(kind, path)| (kind.to_string(), path))
            .collect()
    }

    #[must_use]
    pub fn format_loaded_files(&self) -> Vec<String> {
        self.loaded_files()
            .iter()
            .enumerate()
            .map(|(i, (kind, path))| format!("{}. [{kind}] {}", i + 1, path.display()))
            .collect()
    }
}
