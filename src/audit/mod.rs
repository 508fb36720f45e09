// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Append-only audit trail of a mirror run.
//!
//! ```text
//! resolver  --snapshot(descriptors)-->  <audit_dir>/gitlab-projects.json  (truncated)
//!                                  \--> <audit_dir>/log  "- BACKUP: ..."
//! engine    --record(Info|Exception)--> <audit_dir>/log  (append)
//! ```
//!
//! Records are write-only; nothing in the crate parses them back.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{FsError, MirrorResult};

/// Snapshot file holding the resolved descriptors of the last run.
pub const SNAPSHOT_FILE: &str = "gitlab-projects.json";

/// Append-only log of per-repository records.
pub const LOG_FILE: &str = "log";

/// Kind of audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuditKind {
    /// A repository was cloned or updated.
    Info,
    /// The resolved descriptor set.
    Backup,
    /// A repository failed to reconcile.
    Exception,
}

impl AuditKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Backup => "BACKUP",
            Self::Exception => "EXCEPTION",
        }
    }
}

/// One audit record.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Local>,
    pub kind: AuditKind,
    pub payload: String,
}

impl AuditRecord {
    #[must_use]
    pub fn new(kind: AuditKind, payload: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            kind,
            payload: payload.into(),
        }
    }

    /// Text block written to the log file.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "- {}: -- {} --\n{}\n\n",
            self.kind.as_str(),
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.6f"),
            self.payload
        )
    }
}

/// Destination of audit records.
///
/// Implementations must not fail the caller's operation; the engine logs and
/// ignores sink errors.
pub trait AuditSink {
    /// Append one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be persisted.
    fn record(&mut self, record: AuditRecord) -> MirrorResult<()>;

    /// Persist the full resolved descriptor set, replacing any earlier snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be persisted.
    fn snapshot(&mut self, json: &str) -> MirrorResult<()>;
}

/// File-backed sink under `<backup_root>/<audit_dir>`.
#[derive(Debug, Clone)]
pub struct FileAuditSink {
    dir: PathBuf,
}

impl FileAuditSink {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.dir.join(LOG_FILE)
    }

    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILE)
    }

    fn io_error(path: &Path, source: std::io::Error) -> FsError {
        FsError::IoError {
            path: path.display().to_string(),
            source,
        }
    }

    fn ensure_dir(&self) -> MirrorResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| Self::io_error(&self.dir, e))?;
        Ok(())
    }

    fn append(&self, text: &str) -> MirrorResult<()> {
        self.ensure_dir()?;
        let path = self.log_path();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| Self::io_error(&path, e))?;
        file.write_all(text.as_bytes())
            .map_err(|e| Self::io_error(&path, e))?;
        Ok(())
    }
}

impl AuditSink for FileAuditSink {
    fn record(&mut self, record: AuditRecord) -> MirrorResult<()> {
        self.append(&record.render())
    }

    fn snapshot(&mut self, json: &str) -> MirrorResult<()> {
        self.ensure_dir()?;
        let path = self.snapshot_path();
        std::fs::write(&path, json).map_err(|e| Self::io_error(&path, e))?;
        let count = serde_json::from_str::<Vec<serde_json::Value>>(json).map_or(0, |v| v.len());
        self.append(
            &AuditRecord::new(
                AuditKind::Backup,
                format!("{count} repositories resolved, see {SNAPSHOT_FILE}"),
            )
            .render(),
        )
    }
}

/// In-memory sink, used by `list` and by tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditSink {
    records: Vec<AuditRecord>,
    snapshots: Vec<String>,
}

impl MemoryAuditSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn records(&self) -> &[AuditRecord] {
        &self.records
    }

    #[must_use]
    pub fn snapshots(&self) -> &[String] {
        &self.snapshots
    }

    /// Number of records of the given kind.
    #[must_use]
    pub fn count(&self, kind: AuditKind) -> usize {
        self.records.iter().filter(|r| r.kind == kind).count()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&mut self, record: AuditRecord) -> MirrorResult<()> {
        self.records.push(record);
        Ok(())
    }

    fn snapshot(&mut self, json: &str) -> MirrorResult<()> {
        self.snapshots.push(json.to_string());
        Ok(())
    }
}
