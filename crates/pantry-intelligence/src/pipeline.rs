// ABOUTME: Per-stage batch evaluation of candidates: safety, semantic tags, and fit score
// ABOUTME: Candidates are evaluated in parallel with a barrier between the safety and scoring passes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use pantry_core::models::{Candidate, SafetyOutcome, SemanticTag, UserConstraints};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::config::{SafetyConfig, ScoringConfig};
use crate::normalizer::IngredientNormalizer;
use crate::safety::DietarySafetyFilter;
use crate::scoring::{FitScore, ScoringEngine};
use crate::semantic::failed_tags;

/// Result of evaluating one candidate against one constraints value
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    /// Candidate evaluated
    pub candidate_id: String,
    /// Safety filter outcome
    pub safety: SafetyOutcome,
    /// Semantic tags the candidate failed (empty when not scored)
    pub semantic_failures: Vec<SemanticTag>,
    /// Fit score; `None` for rejected candidates
    pub fit: Option<FitScore>,
}

impl Evaluation {
    /// Passed safety and every semantic tag
    #[must_use]
    pub fn is_golden_eligible(&self) -> bool {
        self.safety.is_pass() && self.semantic_failures.is_empty()
    }

    /// Fit score value, or zero when not scored
    #[must_use]
    pub fn fit_value(&self) -> f64 {
        self.fit.as_ref().map_or(0.0, |f| f.value)
    }
}

/// Safety filter, semantic check, and scoring engine bundled for one request
#[derive(Debug, Clone)]
pub struct CandidateEvaluator {
    normalizer: IngredientNormalizer,
    filter: DietarySafetyFilter,
    scorer: ScoringEngine,
}

impl CandidateEvaluator {
    /// Build every component from configuration
    #[must_use]
    pub fn new(scoring: ScoringConfig, safety: SafetyConfig) -> Self {
        let normalizer = IngredientNormalizer::new();
        let filter = DietarySafetyFilter::new(&normalizer, safety);
        let scorer = ScoringEngine::new(scoring, normalizer.clone());
        Self {
            normalizer,
            filter,
            scorer,
        }
    }

    /// Shared normalizer
    #[must_use]
    pub const fn normalizer(&self) -> &IngredientNormalizer {
        &self.normalizer
    }

    /// Safety filter
    #[must_use]
    pub const fn filter(&self) -> &DietarySafetyFilter {
        &self.filter
    }

    /// Scoring engine
    #[must_use]
    pub const fn scorer(&self) -> &ScoringEngine {
        &self.scorer
    }

    /// Evaluate a batch.
    ///
    /// The safety pass completes for every candidate before scoring begins.
    /// Output order matches input order.
    #[must_use]
    pub fn evaluate_batch(
        &self,
        candidates: &[Arc<Candidate>],
        constraints: &UserConstraints,
    ) -> Vec<Evaluation> {
        let verdicts: Vec<SafetyOutcome> = candidates
            .par_iter()
            .map(|candidate| self.filter.evaluate(candidate, constraints))
            .collect();

        let requirements = constraints.semantic_requirements();
        let evaluations: Vec<Evaluation> = candidates
            .par_iter()
            .zip(verdicts)
            .map(|(candidate, safety)| {
                if safety.is_reject() {
                    return Evaluation {
                        candidate_id: candidate.id.clone(),
                        safety,
                        semantic_failures: Vec::new(),
                        fit: None,
                    };
                }
                Evaluation {
                    candidate_id: candidate.id.clone(),
                    semantic_failures: failed_tags(candidate, &requirements),
                    fit: Some(self.scorer.score(
                        candidate,
                        constraints,
                        constraints.profile(),
                        constraints.mood(),
                    )),
                    safety,
                }
            })
            .collect();

        debug!(
            candidates = evaluations.len(),
            rejected = evaluations.iter().filter(|e| e.safety.is_reject()).count(),
            "Evaluated candidate batch"
        );
        evaluations
    }
}
