// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository reconciliation.
//!
//! ```text
//!  Vec<RepositoryDescriptor>
//!           |
//!           v
//!  DescriptorStore --> Reconciler::reconcile --> ReconciliationOutcome
//!     ^   counts          (engine.rs)                 |
//!     |   pending <-----------------------------------+
//!     |
//!  retry.rs: run_retry_rounds(RetryGate) --> retry_failed
//! ```
//!
//! Descriptors are processed strictly one after another.

pub mod engine;
pub mod retry;
pub mod session;
pub mod store;

pub use engine::{
    GitReconciler, ReconcileFailure, ReconcileOptions, ReconcileStep, ReconciliationOutcome,
    Reconciler, reconcile,
};
pub use retry::{AutoGate, NeverGate, PromptGate, RetryGate, RetryReport};
pub use session::{ProgressDisplay, SyncSession, SyncSettings, SyncSummary};
pub use store::{ActionCounts, DescriptorStore};
