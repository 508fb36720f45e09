// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   config (options, config-files), list, sync
//!   prompt: fills settings still missing after loading
//! ```

pub mod config;
pub mod list;
pub mod prompt;
pub mod sync;
