// ABOUTME: Fallback pipeline stages and the per-request state threaded through them
// ABOUTME: Owns the tier ledger, evaluations, review queues, quota budget, and deadline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;
use std::sync::Arc;

use pantry_core::models::{Candidate, QuotaBudget, RelaxedConstraint, UserConstraints};
use pantry_intelligence::{Evaluation, TierError, TierLedger};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::warn;

use super::trace::StageTrace;

/// Stage of the fallback state machine. Variant order is execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineStage {
    /// Full constraints
    Strict,
    /// Semantic tags dropped, safety kept
    SafetyOnly,
    /// Arbiter resolves ambiguities and confirms tags
    ArbiterReview,
    /// Arbiter generates new candidates
    ExternalGeneration,
    /// Terminal
    Done,
}

impl PipelineStage {
    /// String representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "STRICT",
            Self::SafetyOnly => "SAFETY_ONLY",
            Self::ArbiterReview => "ARBITER_REVIEW",
            Self::ExternalGeneration => "EXTERNAL_GENERATION",
            Self::Done => "DONE",
        }
    }
}

/// Mutable state of one request. Never shared between requests.
pub(crate) struct RequestState {
    pub constraints: UserConstraints,
    pub ledger: TierLedger,
    pub candidates: HashMap<String, Arc<Candidate>>,
    pub evaluations: HashMap<String, Evaluation>,
    pub relaxations: HashMap<String, Vec<RelaxedConstraint>>,
    /// Passed safety on the strict pass but failed a tag; tiered on relaxation
    pub deferred: Vec<String>,
    /// NEEDS_REVIEW candidates awaiting the arbiter
    pub safety_reviews: Vec<String>,
    pub budget: QuotaBudget,
    pub notes: Vec<String>,
    pub trace: StageTrace,
    pub degraded: bool,
    pub threshold: usize,
    pub started: Instant,
    pub deadline: Instant,
    stage: PipelineStage,
}

impl RequestState {
    pub fn new(
        constraints: UserConstraints,
        budget: QuotaBudget,
        threshold: usize,
        started: Instant,
        deadline: Instant,
    ) -> Self {
        Self {
            constraints,
            ledger: TierLedger::new(),
            candidates: HashMap::new(),
            evaluations: HashMap::new(),
            relaxations: HashMap::new(),
            deferred: Vec::new(),
            safety_reviews: Vec::new(),
            budget,
            notes: Vec::new(),
            trace: StageTrace::default(),
            degraded: false,
            threshold,
            started,
            deadline,
            stage: PipelineStage::Strict,
        }
    }

    pub const fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Advance to `to`. Moves that do not go forward are ignored.
    pub fn advance(&mut self, to: PipelineStage, reason: impl Into<String>) {
        if to <= self.stage {
            warn!(
                from = self.stage.as_str(),
                to = to.as_str(),
                "Ignoring backward stage transition"
            );
            return;
        }
        let elapsed_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.trace.record(
            self.stage,
            to,
            reason,
            &self.ledger,
            self.threshold,
            elapsed_ms,
        );
        self.stage = to;
    }

    pub fn deadline_passed(&self) -> bool {
        Instant::now() >= self.deadline
    }

    pub fn validated(&self) -> usize {
        self.ledger.validated_count()
    }

    pub fn fit_of(&self, candidate_id: &str) -> f64 {
        self.evaluations
            .get(candidate_id)
            .map_or(0.0, Evaluation::fit_value)
    }

    /// Sort ids best fit first, ties by id
    pub fn sort_by_fit(&self, ids: &mut [String]) {
        ids.sort_by(|a, b| {
            self.fit_of(b)
                .total_cmp(&self.fit_of(a))
                .then_with(|| a.cmp(b))
        });
    }
}

/// Log ledger errors; they indicate a pipeline bug, never a user-facing failure
pub(crate) fn log_tier_error(result: Result<(), TierError>) {
    if let Err(e) = result {
        warn!(error = %e, "Tier ledger rejected a transition");
    }
}
