// ABOUTME: Stage transition records for one request, logged as each transition happens
// ABOUTME: Captures the triggering condition: tier counts, threshold, elapsed time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pantry_core::models::ConfidenceTier;
use pantry_intelligence::TierLedger;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::state::PipelineStage;

/// One move of the state machine and the counts that caused it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTransition {
    /// Stage left
    pub from: PipelineStage,
    /// Stage entered
    pub to: PipelineStage,
    /// Triggering condition
    pub reason: String,
    /// GOLDEN candidates at transition time
    pub golden: usize,
    /// RESCUE candidates at transition time
    pub rescue: usize,
    /// UPGRADED candidates at transition time
    pub upgraded: usize,
    /// All tiered candidates
    pub validated: usize,
    /// Validated count the request aims for
    pub threshold: usize,
    /// Milliseconds since the request started
    pub elapsed_ms: u64,
}

/// Ordered transitions of one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTrace {
    transitions: Vec<StageTransition>,
}

impl StageTrace {
    /// Record and log a transition
    pub(crate) fn record(
        &mut self,
        from: PipelineStage,
        to: PipelineStage,
        reason: impl Into<String>,
        ledger: &TierLedger,
        threshold: usize,
        elapsed_ms: u64,
    ) {
        let transition = StageTransition {
            from,
            to,
            reason: reason.into(),
            golden: ledger.count(ConfidenceTier::Golden),
            rescue: ledger.count(ConfidenceTier::Rescue),
            upgraded: ledger.count(ConfidenceTier::Upgraded),
            validated: ledger.validated_count(),
            threshold,
            elapsed_ms,
        };
        info!(
            from = from.as_str(),
            to = to.as_str(),
            reason = %transition.reason,
            golden = transition.golden,
            rescue = transition.rescue,
            upgraded = transition.upgraded,
            threshold,
            elapsed_ms,
            "Pipeline stage transition"
        );
        self.transitions.push(transition);
    }

    /// Transitions in order
    #[must_use]
    pub fn transitions(&self) -> &[StageTransition] {
        &self.transitions
    }

    /// Every stage entered, starting with STRICT
    #[must_use]
    pub fn stages(&self) -> Vec<PipelineStage> {
        let mut stages = vec![PipelineStage::Strict];
        stages.extend(self.transitions.iter().map(|t| t.to));
        stages
    }

    /// True when the stages visited strictly advance
    #[must_use]
    pub fn is_forward_only(&self) -> bool {
        self.transitions.iter().all(|t| t.to > t.from)
    }
}
