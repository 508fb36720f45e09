// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Descriptor store and action tally.
//!
//! ```text
//! record(Cloned)  --> cloned += 1
//! record(Updated) --> updated += 1
//! record(Failed)  --> failed += 1, pending: remove id, push back
//!
//! record_retry(Cloned|Updated) --> cloned|updated += 1, pending: remove id
//! record_retry(Failed)         --> pending: remove id, push back
//! ```

use serde::Serialize;

use super::engine::ReconciliationOutcome;
use crate::gitlab::RepositoryDescriptor;

/// Per-action counters of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActionCounts {
    pub cloned: usize,
    pub updated: usize,
    pub failed: usize,
}

impl std::fmt::Display for ActionCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cloned: {}, updated: {}, failed: {}",
            self.cloned, self.updated, self.failed
        )
    }
}

/// Ordered descriptors of one run plus the failures awaiting retry.
#[derive(Debug, Default)]
pub struct DescriptorStore {
    descriptors: Vec<RepositoryDescriptor>,
    counts: ActionCounts,
    pending: Vec<RepositoryDescriptor>,
}

impl DescriptorStore {
    #[must_use]
    pub fn new(descriptors: Vec<RepositoryDescriptor>) -> Self {
        Self {
            descriptors,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn descriptors(&self) -> &[RepositoryDescriptor] {
        &self.descriptors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    #[must_use]
    pub const fn counts(&self) -> ActionCounts {
        self.counts
    }

    /// Failed descriptors in retry order.
    #[must_use]
    pub fn pending(&self) -> &[RepositoryDescriptor] {
        &self.pending
    }

    /// Apply the outcome of a first attempt.
    pub fn record(&mut self, descriptor: &RepositoryDescriptor, outcome: &ReconciliationOutcome) {
        match outcome {
            ReconciliationOutcome::Cloned => self.counts.cloned += 1,
            ReconciliationOutcome::Updated => self.counts.updated += 1,
            ReconciliationOutcome::Failed(_) => {
                self.counts.failed += 1;
                self.push_pending(descriptor);
            }
        }
    }

    /// Apply the outcome of a retry attempt.
    ///
    /// A repeated failure only moves the descriptor to the back of the list.
    pub fn record_retry(
        &mut self,
        descriptor: &RepositoryDescriptor,
        outcome: &ReconciliationOutcome,
    ) {
        match outcome {
            ReconciliationOutcome::Cloned => {
                self.counts.cloned += 1;
                self.remove_pending(descriptor.id);
            }
            ReconciliationOutcome::Updated => {
                self.counts.updated += 1;
                self.remove_pending(descriptor.id);
            }
            ReconciliationOutcome::Failed(_) => self.push_pending(descriptor),
        }
    }

    fn push_pending(&mut self, descriptor: &RepositoryDescriptor) {
        self.remove_pending(descriptor.id);
        self.pending.push(descriptor.clone());
    }

    fn remove_pending(&mut self, id: u64) {
        self.pending.retain(|d| d.id != id);
    }
}
