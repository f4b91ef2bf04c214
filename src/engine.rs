// ABOUTME: Recommendation engine facade exposing recommend(), explanations, and substitutions
// ABOUTME: Validates constraints up front, runs the fallback orchestrator, and builds the report
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;
use std::sync::Arc;

use pantry_core::models::{
    Candidate, CandidateOrigin, ConfidenceTier, ConstraintsRequest, RelaxedConstraint,
    SafetyOutcome, TierStatus, UserConstraints,
};
use pantry_intelligence::{Evaluation, ProvenanceEvent, ScoreBreakdown, TierLedger};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::collaborators::{RecipeArbiter, RecipeDiscovery};
use crate::config::EngineConfig;
use crate::errors::{AppError, AppResult};
use crate::orchestrator::{FallbackOrchestrator, PipelineOutcome, StageTrace};
use crate::substitutions::{SubstitutionAdvisor, SubstitutionLimits, SubstitutionReport};

/// One returned recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    /// Candidate id
    pub id: String,
    /// Display title
    pub title: String,
    /// Confidence tier
    pub tier: ConfidenceTier,
    /// Numeric tier value
    pub tier_value: f64,
    /// Fit score, used only to order within a tier
    pub fit_score: f64,
    /// Where the candidate came from
    pub origin: CandidateOrigin,
    /// Constraints relaxed to admit it
    pub relaxed_constraints: Vec<String>,
}

/// Why a candidate ended up where it did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    /// Candidate id
    pub candidate_id: String,
    /// Display title
    pub title: String,
    /// Where the candidate came from
    pub origin: CandidateOrigin,
    /// Safety filter outcome
    pub safety: SafetyOutcome,
    /// Final tier status
    pub status: TierStatus,
    /// Tier provenance in order
    pub history: Vec<ProvenanceEvent>,
    /// Score breakdown, absent for rejected candidates
    pub score: Option<ScoreBreakdown>,
    /// Constraints relaxed to admit it
    pub relaxed_constraints: Vec<RelaxedConstraint>,
}

/// Result of one `recommend` call
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    /// Request identifier for log correlation
    pub request_id: Uuid,
    /// Ranked results: tier descending, fit descending
    pub items: Vec<RankedCandidate>,
    /// Stage transitions
    pub trace: StageTrace,
    /// Relaxations and degraded-service notes
    pub notes: Vec<String>,
    /// Collaborator calls left unspent
    pub budget_remaining: u32,
    /// Results may be incomplete (time budget or collaborator failure)
    pub degraded: bool,
    #[serde(skip)]
    details: RequestDetails,
}

/// Per-candidate data kept for explanations
#[derive(Debug, Clone)]
struct RequestDetails {
    constraints: UserConstraints,
    ledger: TierLedger,
    candidates: HashMap<String, Arc<Candidate>>,
    evaluations: HashMap<String, Evaluation>,
    relaxations: HashMap<String, Vec<RelaxedConstraint>>,
}

impl Recommendation {
    fn from_outcome(request_id: Uuid, outcome: PipelineOutcome) -> Self {
        let items = outcome
            .ranked
            .iter()
            .filter_map(|id| {
                let candidate = outcome.candidates.get(id)?;
                let tier = outcome.ledger.tier(id)?;
                Some(RankedCandidate {
                    id: id.clone(),
                    title: candidate.title.clone(),
                    tier,
                    tier_value: tier.value(),
                    fit_score: outcome.evaluations.get(id).map_or(0.0, Evaluation::fit_value),
                    origin: candidate.origin,
                    relaxed_constraints: outcome
                        .relaxations
                        .get(id)
                        .map(|r| r.iter().map(RelaxedConstraint::describe).collect())
                        .unwrap_or_default(),
                })
            })
            .collect();

        Self {
            request_id,
            items,
            trace: outcome.trace,
            notes: outcome.notes,
            budget_remaining: outcome.budget.remaining(),
            degraded: outcome.degraded,
            details: RequestDetails {
                constraints: outcome.constraints,
                ledger: outcome.ledger,
                candidates: outcome.candidates,
                evaluations: outcome.evaluations,
                relaxations: outcome.relaxations,
            },
        }
    }

    /// Explain any candidate this request evaluated, returned or not
    #[must_use]
    pub fn explain(&self, candidate_id: &str) -> Option<Explanation> {
        let details = &self.details;
        let candidate = details.candidates.get(candidate_id)?;
        let evaluation = details.evaluations.get(candidate_id)?;
        Some(Explanation {
            candidate_id: candidate_id.to_owned(),
            title: candidate.title.clone(),
            origin: candidate.origin,
            safety: evaluation.safety.clone(),
            status: details.ledger.status(candidate_id)?,
            history: details.ledger.history(candidate_id).to_vec(),
            score: evaluation.fit.as_ref().map(|f| f.breakdown.clone()),
            relaxed_constraints: details
                .relaxations
                .get(candidate_id)
                .cloned()
                .unwrap_or_default(),
        })
    }

    /// Ids of every candidate the request evaluated, sorted
    #[must_use]
    pub fn evaluated_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.details.candidates.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// True when nothing was returned
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Entry point: one engine serves many requests, each with its own state
pub struct RecommendationEngine {
    orchestrator: FallbackOrchestrator,
    advisor: SubstitutionAdvisor,
}

impl RecommendationEngine {
    /// Create an engine over the discovery and arbiter collaborators
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `config` fails validation
    pub fn new(
        config: EngineConfig,
        discovery: Arc<dyn RecipeDiscovery>,
        arbiter: Arc<dyn RecipeArbiter>,
    ) -> AppResult<Self> {
        config
            .validate()
            .map_err(|e| AppError::config(format!("invalid engine configuration: {e}")))?;
        info!(
            discovery = discovery.name(),
            arbiter = arbiter.name(),
            min_validated = config.min_validated,
            quota = config.quota_per_request,
            "Recommendation engine ready"
        );
        let orchestrator = FallbackOrchestrator::new(config.clone(), discovery, Arc::clone(&arbiter));
        let advisor = SubstitutionAdvisor::new(
            arbiter,
            orchestrator.evaluator().clone(),
            config.retry,
            SubstitutionLimits {
                max_items: config.substitution_limit,
                quota: config.quota_per_request,
                budget: config.request_budget(),
            },
        );
        Ok(Self {
            orchestrator,
            advisor,
        })
    }

    /// Parse and validate a request's constraints
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error for an empty ingredient list or an unknown name
    pub fn parse_constraints(
        &self,
        ingredients: &[String],
        request: &ConstraintsRequest,
    ) -> AppResult<UserConstraints> {
        let normalizer = self.orchestrator.evaluator().normalizer();
        UserConstraints::parse(ingredients, request, |raw| normalizer.normalize(raw))
            .map_err(AppError::from)
    }

    /// Rank safe recipes for the given pantry and constraints.
    ///
    /// Only invalid constraints fail; collaborator failures and the time
    /// budget degrade the result instead.
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error when the constraints cannot be parsed
    #[instrument(skip_all, fields(ingredients = ingredients.len()))]
    pub async fn recommend(
        &self,
        ingredients: &[String],
        request: &ConstraintsRequest,
    ) -> AppResult<Recommendation> {
        let request_id = Uuid::new_v4();
        let constraints = self.parse_constraints(ingredients, request)?;
        info!(%request_id, target_count = constraints.target_count(), "Recommendation request accepted");
        let outcome = self.orchestrator.run(constraints).await;
        Ok(Recommendation::from_outcome(request_id, outcome))
    }

    /// Suggest stand-ins for the ingredients a returned recipe needs but the
    /// user lacks, under the request's original constraints.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when `candidate_id` is not among the returned items
    #[instrument(skip_all, fields(candidate_id = %candidate_id))]
    pub async fn suggest_substitutions(
        &self,
        recommendation: &Recommendation,
        candidate_id: &str,
    ) -> AppResult<SubstitutionReport> {
        let Some(item) = recommendation.items.iter().find(|i| i.id == candidate_id) else {
            return Err(AppError::not_found(format!("returned recipe {candidate_id}")));
        };
        let details = &recommendation.details;
        let missing = details
            .evaluations
            .get(candidate_id)
            .and_then(|e| e.fit.as_ref())
            .map(|f| f.breakdown.missing.clone())
            .unwrap_or_default();
        Ok(self
            .advisor
            .suggest(candidate_id, &item.title, &missing, &details.constraints)
            .await)
    }
}
