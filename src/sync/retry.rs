// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Operator-gated retry of failed repositories.
//!
//! ```text
//! run_retry_rounds
//!   while pending non-empty && gate.approve(round, pending):
//!     retry_failed
//!       snapshot pending
//!       for d in snapshot: reconciler.reconcile(d) --> store.record_retry
//! ```

use dialoguer::Confirm;
use dialoguer::theme::ColorfulTheme;

use super::engine::Reconciler;
use super::store::DescriptorStore;
use crate::audit::AuditSink;

/// Result of one retry round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryReport {
    pub attempted: usize,
    pub recovered: usize,
}

/// Decides whether another retry round runs.
pub trait RetryGate {
    /// `round` starts at 1; `pending` is the current failure count.
    fn approve(&mut self, round: u32, pending: usize) -> bool;
}

/// Asks the operator on the terminal.
#[derive(Debug, Default)]
pub struct PromptGate;

impl RetryGate for PromptGate {
    fn approve(&mut self, round: u32, pending: usize) -> bool {
        let prompt = format!("{pending} repositories failed. Retry them (round {round})?");
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(true)
            .interact()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "retry prompt failed, not retrying");
                false
            })
    }
}

/// Approves up to `max_rounds` rounds without asking.
#[derive(Debug, Clone, Copy)]
pub struct AutoGate {
    max_rounds: u32,
}

impl AutoGate {
    #[must_use]
    pub const fn new(max_rounds: u32) -> Self {
        Self { max_rounds }
    }
}

impl RetryGate for AutoGate {
    fn approve(&mut self, round: u32, _pending: usize) -> bool {
        round <= self.max_rounds
    }
}

/// Never approves a round.
#[derive(Debug, Default)]
pub struct NeverGate;

impl RetryGate for NeverGate {
    fn approve(&mut self, _round: u32, _pending: usize) -> bool {
        false
    }
}

/// Re-run every currently failed descriptor once.
pub fn retry_failed(
    store: &mut DescriptorStore,
    reconciler: &mut dyn Reconciler,
    audit: &mut dyn AuditSink,
) -> RetryReport {
    let snapshot = store.pending().to_vec();
    let mut report = RetryReport::default();

    for descriptor in &snapshot {
        tracing::info!(repo = %descriptor.path_with_namespace, "retrying");
        let outcome = reconciler.reconcile(descriptor, audit);
        report.attempted += 1;
        if outcome.is_success() {
            report.recovered += 1;
        }
        store.record_retry(descriptor, &outcome);
    }

    tracing::info!(
        attempted = report.attempted,
        recovered = report.recovered,
        "retry round finished"
    );
    report
}

/// Run retry rounds while failures remain and `gate` approves.
///
/// Returns the number of rounds that ran.
pub fn run_retry_rounds(
    store: &mut DescriptorStore,
    reconciler: &mut dyn Reconciler,
    audit: &mut dyn AuditSink,
    gate: &mut dyn RetryGate,
) -> u32 {
    let mut rounds = 0;
    while !store.pending().is_empty() && gate.approve(rounds + 1, store.pending().len()) {
        rounds += 1;
        retry_failed(store, reconciler, audit);
    }
    rounds
}
