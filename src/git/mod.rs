// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Access to local working copies.
//!
//! ```text
//!        Public API
//!     query.rs   cmd.rs
//!          \       /
//!           v     v
//!      ,------------------,
//!      | backend (traits) |
//!      '--+----------+----'
//!         |          |
//!         v          v
//!    GitQuery    GitMutation
//!   (gix, read)  (CLI, write)
//!         |          |
//!         v          v
//!    GixBackend  ShellBackend
//!    .is_working .clone/fetch
//!    .branch     .checkout
//!    .uncommit   .pull
//!    .stashed    .stash_push
//!    .newest
//! ```
//!
//! **`GixBackend`**: pure Rust, no subprocess, read-only.
//! **`ShellBackend`**: git CLI for everything that touches a remote or the work tree.

pub mod backend;
pub mod cmd;
pub mod query;

pub use backend::RemoteBranch;

#[cfg(test)]
mod tests;
