// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! GitLab catalog access.
//!
//! ```text
//! auth::acquire --> Credential --> GitlabClient (Authorization header)
//!                                       |
//!                                       v
//!                 CatalogResolver::resolve(Selector)
//!                                       |
//!                                       v
//!                        Vec<RepositoryDescriptor>
//! ```

pub mod auth;
pub mod client;
pub mod resolver;
pub mod types;

pub use client::GitlabClient;
pub use resolver::{CatalogResolver, ExcludeFilter};
pub use types::{Credential, RepositoryDescriptor, Selector};
