// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |           sync / list / options
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |   TOML, env, --set, flags |
//!              '--+-----------+--------+---'
//!                 |           |        |
//!                 v           v        v
//!              gitlab       sync     audit
//!          resolver/auth  engine,   log file,
//!           (reqwest)     retry     snapshot
//!                           |
//!                           v
//!                          git
//!                     gix / git CLI
//!
//!   +-----------------------------------------+
//!   |  foundation   error, logging, utility   |
//!   +-----------------------------------------+
//! ```

pub mod audit;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod git;
pub mod gitlab;
pub mod logging;
pub mod sync;
pub mod utility;
