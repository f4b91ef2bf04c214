// ABOUTME: Substitution advisor suggesting stand-ins for a recipe's missing ingredients
// ABOUTME: Asks the arbiter per missing item and keeps only stand-ins the safety filter passes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;
use std::time::Duration;

use pantry_core::models::{CandidateOrigin, QuotaBudget, RawRecipe, UserConstraints};
use pantry_intelligence::CandidateEvaluator;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::collaborators::{RecipeArbiter, SubstitutionRequest, SubstitutionSuggestion};
use crate::config::RetryPolicy;
use crate::retry::call_with_retry;

/// A missing ingredient left without a stand-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSubstitution {
    /// Ingredient the user lacks
    pub missing_item: String,
    /// Why no stand-in is offered
    pub reason: String,
}

/// Stand-ins for one recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionReport {
    /// Candidate the advice is for
    pub candidate_id: String,
    /// Stand-ins that passed the safety filter, in recipe order
    pub suggestions: Vec<SubstitutionSuggestion>,
    /// Missing items with no usable stand-in
    pub unavailable: Vec<SkippedSubstitution>,
    /// Arbiter calls left unspent
    pub budget_remaining: u32,
}

impl SubstitutionReport {
    /// True when no stand-in was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }
}

/// Settings for one advisor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstitutionLimits {
    /// Missing items asked about per recipe
    pub max_items: usize,
    /// Arbiter calls allowed per recipe
    pub quota: u32,
    /// Wall-clock budget per recipe
    pub budget: Duration,
}

/// Suggests stand-ins for ingredients a returned recipe needs but the user lacks.
///
/// Every suggestion is screened by the same dietary safety filter as recipe
/// candidates. Only a PASS keeps it; NEEDS_REVIEW and REJECT drop it.
pub struct SubstitutionAdvisor {
    arbiter: Arc<dyn RecipeArbiter>,
    evaluator: CandidateEvaluator,
    retry: RetryPolicy,
    limits: SubstitutionLimits,
}

impl SubstitutionAdvisor {
    /// Create an advisor over the given arbiter
    #[must_use]
    pub fn new(
        arbiter: Arc<dyn RecipeArbiter>,
        evaluator: CandidateEvaluator,
        retry: RetryPolicy,
        limits: SubstitutionLimits,
    ) -> Self {
        Self {
            arbiter,
            evaluator,
            retry,
            limits,
        }
    }

    /// Ask for a stand-in for each of the first `max_items` missing ingredients.
    ///
    /// Collaborator failures never fail the call; the item is listed as
    /// unavailable with the reason.
    pub async fn suggest(
        &self,
        candidate_id: &str,
        recipe_title: &str,
        missing: &[String],
        constraints: &UserConstraints,
    ) -> SubstitutionReport {
        let deadline = Instant::now() + self.limits.budget;
        let mut budget = QuotaBudget::new(self.limits.quota);
        let mut suggestions = Vec::new();
        let mut unavailable = Vec::new();
        let arbiter = self.arbiter.name().to_owned();

        for item in missing.iter().take(self.limits.max_items) {
            let request = SubstitutionRequest::from_constraints(constraints, recipe_title, item);
            let (response, left) = call_with_retry(
                &arbiter,
                "suggest_substitutes",
                &self.retry,
                budget,
                deadline,
                || self.arbiter.suggest_substitutes(&request),
            )
            .await;
            budget = left;

            match response {
                Ok(suggestion) => match self.screen(&suggestion, constraints) {
                    Ok(()) => suggestions.push(suggestion),
                    Err(reason) => {
                        warn!(item = %item, substitute = %suggestion.substitute, reason = %reason, "Dropping unsafe substitute");
                        unavailable.push(SkippedSubstitution {
                            missing_item: item.clone(),
                            reason,
                        });
                    }
                },
                Err(e) => {
                    debug!(item = %item, error = %e, "No substitute available");
                    unavailable.push(SkippedSubstitution {
                        missing_item: item.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            candidate_id,
            suggested = suggestions.len(),
            unavailable = unavailable.len(),
            "Substitution advice ready"
        );
        SubstitutionReport {
            candidate_id: candidate_id.to_owned(),
            suggestions,
            unavailable,
            budget_remaining: budget.remaining(),
        }
    }

    /// Run the stand-in through the safety filter as a one-ingredient recipe
    fn screen(
        &self,
        suggestion: &SubstitutionSuggestion,
        constraints: &UserConstraints,
    ) -> Result<(), String> {
        let raw = RawRecipe::new(
            format!("substitute-{}", suggestion.missing_item),
            suggestion.substitute.clone(),
        )
        .with_ingredients(&[suggestion.substitute.as_str()]);
        let candidate = self
            .evaluator
            .normalizer()
            .candidate(raw, CandidateOrigin::Generated, self.arbiter.name())
            .map_err(|e| format!("substitute rejected: {e}"))?;
        let outcome = self.evaluator.filter().evaluate(&candidate, constraints);
        if outcome.is_pass() {
            return Ok(());
        }
        Err(format!(
            "substitute '{}' is {}: {}",
            suggestion.substitute,
            outcome.verdict.as_str(),
            outcome.reason.as_deref().unwrap_or("no reason given")
        ))
    }
}
