// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Utility modules.
//!
//! ```text
//! fs
//!   ensure_dir()         create a directory tree, reject files in the way
//!   resolve_backup_root() absolute backup root, created on demand
//! ```

pub mod fs;
