// ABOUTME: Fallback orchestrator running STRICT, SAFETY_ONLY, ARBITER_REVIEW, EXTERNAL_GENERATION, DONE
// ABOUTME: Widens the search forward-only until enough tiered candidates exist or the budget runs out
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Fallback Orchestrator
//!
//! Each request walks the stages in order and never revisits one:
//!
//! - `STRICT`: full constraints. PASS with every tag is GOLDEN.
//! - `SAFETY_ONLY`: tags dropped, safety kept. Survivors are RESCUE; a
//!   reduced ingredient search follows if the count is still short.
//! - `ARBITER_REVIEW`: the arbiter resolves NEEDS_REVIEW verdicts and
//!   confirms failed tags on RESCUE candidates (RESCUE to UPGRADED).
//! - `EXTERNAL_GENERATION`: the arbiter writes new recipes, which are
//!   evaluated under the strict rules.
//! - `DONE`: unresolved ambiguity is rejected and the tiered candidates are
//!   ranked.
//!
//! Unresolved safety ambiguity is always rejected.

pub mod state;
pub mod trace;

use std::collections::HashMap;
use std::mem;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use pantry_core::models::{
    Candidate, CandidateOrigin, ConfidenceTier, QuotaBudget, RawRecipe, RelaxedConstraint,
    SafetyOutcome, UserConstraints,
};
use pantry_intelligence::{CandidateEvaluator, Evaluation, TierLedger};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::collaborators::{
    ArbiterVerdict, DiscoveryQuery, GenerationRequest, RecipeArbiter, RecipeDiscovery,
    ReviewKind, ValidationRequest,
};
use crate::config::EngineConfig;
use crate::prioritizer::IngredientPrioritizer;
use crate::retry::call_with_retry;

pub use state::PipelineStage;
use state::{log_tier_error, RequestState};
pub use trace::{StageTrace, StageTransition};

/// Everything a finished request produced
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Constraints the request ran under
    pub constraints: UserConstraints,
    /// Tier status and provenance for every candidate seen
    pub ledger: TierLedger,
    /// Every candidate seen, by id
    pub candidates: HashMap<String, Arc<Candidate>>,
    /// Latest evaluation per candidate
    pub evaluations: HashMap<String, Evaluation>,
    /// Constraints relaxed to admit each candidate
    pub relaxations: HashMap<String, Vec<RelaxedConstraint>>,
    /// Final ranked ids: tier descending, fit descending, id ascending
    pub ranked: Vec<String>,
    /// Stage transitions
    pub trace: StageTrace,
    /// Relaxations and failures worth telling the caller about
    pub notes: Vec<String>,
    /// Collaborator calls left unspent
    pub budget: QuotaBudget,
    /// The request ran out of time or lost results to a collaborator failure
    pub degraded: bool,
}

/// Runs the fallback state machine for one request at a time
pub struct FallbackOrchestrator {
    config: EngineConfig,
    evaluator: CandidateEvaluator,
    discovery: Arc<dyn RecipeDiscovery>,
    arbiter: Arc<dyn RecipeArbiter>,
    prioritizer: IngredientPrioritizer,
}

impl FallbackOrchestrator {
    /// Create an orchestrator over the two collaborators
    #[must_use]
    pub fn new(
        config: EngineConfig,
        discovery: Arc<dyn RecipeDiscovery>,
        arbiter: Arc<dyn RecipeArbiter>,
    ) -> Self {
        let evaluator = CandidateEvaluator::new(config.scoring.clone(), config.safety);
        let prioritizer = IngredientPrioritizer::new(
            Arc::clone(&arbiter),
            evaluator.normalizer().clone(),
            config.retry,
        );
        Self {
            config,
            evaluator,
            discovery,
            arbiter,
            prioritizer,
        }
    }

    /// Shared evaluator (normalizer, safety filter, scorer)
    #[must_use]
    pub const fn evaluator(&self) -> &CandidateEvaluator {
        &self.evaluator
    }

    /// Run every stage for `constraints`
    pub async fn run(&self, constraints: UserConstraints) -> PipelineOutcome {
        let started = Instant::now();
        let deadline = started + self.config.request_budget();
        let threshold = self.config.min_validated.min(constraints.target_count()).max(1);
        let mut state = RequestState::new(
            constraints,
            QuotaBudget::new(self.config.quota_per_request),
            threshold,
            started,
            deadline,
        );

        self.strict_stage(&mut state).await;
        let golden = state.ledger.count(ConfidenceTier::Golden);
        if golden >= threshold {
            state.advance(
                PipelineStage::Done,
                format!("{golden} golden candidates meet threshold {threshold}"),
            );
        } else if !self.ensure_time(&mut state) {
            state.advance(
                PipelineStage::SafetyOnly,
                format!("{golden} golden candidates below threshold {threshold}"),
            );
            self.safety_only_stage(&mut state).await;
        }

        if state.stage() == PipelineStage::SafetyOnly && !self.ensure_time(&mut state) {
            if has_pending_reviews(&state) {
                state.advance(PipelineStage::ArbiterReview, "candidates awaiting arbiter review");
                self.arbiter_review_stage(&mut state).await;
            } else if state.validated() < threshold {
                state.advance(
                    PipelineStage::ExternalGeneration,
                    format!(
                        "{} validated below threshold {threshold}, nothing to review",
                        state.validated()
                    ),
                );
            }
        }

        if state.stage() == PipelineStage::ArbiterReview
            && !self.ensure_time(&mut state)
            && state.validated() < threshold
        {
            state.advance(
                PipelineStage::ExternalGeneration,
                format!(
                    "{} validated below threshold {threshold} after review",
                    state.validated()
                ),
            );
        }

        if state.stage() == PipelineStage::ExternalGeneration && !self.ensure_time(&mut state) {
            self.generation_stage(&mut state).await;
        }

        if state.stage() != PipelineStage::Done {
            let validated = state.validated();
            state.advance(
                PipelineStage::Done,
                format!("pipeline complete with {validated} validated candidates"),
            );
        }
        finish(state)
    }

    /// Jump to DONE when the wall-clock budget is spent. Returns true if it did.
    fn ensure_time(&self, state: &mut RequestState) -> bool {
        if !state.deadline_passed() {
            return false;
        }
        warn!(
            stage = state.stage().as_str(),
            budget_ms = self.config.request_budget_ms,
            "Request budget exhausted, returning current results"
        );
        state.degraded = true;
        state.notes.push(format!(
            "request budget of {}ms exhausted during {}",
            self.config.request_budget_ms,
            state.stage().as_str()
        ));
        state.advance(PipelineStage::Done, "request budget exhausted");
        true
    }

    async fn strict_stage(&self, state: &mut RequestState) {
        let stage = PipelineStage::Strict;
        let query = DiscoveryQuery::from_constraints(&state.constraints, self.config.discovery_limit);
        let raws = self.discover(state, &query, stage).await;
        let admitted = self.admit(state, raws, CandidateOrigin::Discovery, stage);

        for (id, evaluation) in admitted {
            if route_unsafe(state, &id, &evaluation, stage) {
                continue;
            }
            if evaluation.semantic_failures.is_empty() {
                log_tier_error(state.ledger.assign(
                    &id,
                    ConfidenceTier::Golden,
                    stage.as_str(),
                    "passed safety and every tag",
                ));
            } else {
                state.deferred.push(id);
            }
        }
        info!(
            golden = state.ledger.count(ConfidenceTier::Golden),
            deferred = state.deferred.len(),
            safety_reviews = state.safety_reviews.len(),
            "Strict pass complete"
        );
    }

    async fn safety_only_stage(&self, state: &mut RequestState) {
        let stage = PipelineStage::SafetyOnly;
        let relaxed = state.constraints.safety_only();
        let dropped: Vec<String> = relaxed.relaxations().iter().map(RelaxedConstraint::describe).collect();
        if !dropped.is_empty() {
            state.notes.push(dropped.join("; "));
        }

        for id in mem::take(&mut state.deferred) {
            let failures = failure_relaxations(state, &id);
            log_tier_error(state.ledger.assign(
                &id,
                ConfidenceTier::Rescue,
                stage.as_str(),
                "passed safety with relaxed tags",
            ));
            state.relaxations.insert(id, failures);
        }

        // The strict query already returned everything a tagless query would
        // when no tags were requested.
        if !state.constraints.semantic_requirements().is_empty() {
            let query = DiscoveryQuery::from_constraints(&relaxed, self.config.discovery_limit);
            let raws = self.discover(state, &query, stage).await;
            let admitted = self.admit(state, raws, CandidateOrigin::Discovery, stage);
            for (id, evaluation) in admitted {
                if route_unsafe(state, &id, &evaluation, stage) {
                    continue;
                }
                if evaluation.semantic_failures.is_empty() {
                    log_tier_error(state.ledger.assign(
                        &id,
                        ConfidenceTier::Golden,
                        stage.as_str(),
                        "tagless search result carries every tag",
                    ));
                } else {
                    let failures = failure_relaxations(state, &id);
                    log_tier_error(state.ledger.assign(
                        &id,
                        ConfidenceTier::Rescue,
                        stage.as_str(),
                        "passed safety with relaxed tags",
                    ));
                    state.relaxations.insert(id, failures);
                }
            }
        }

        if state.validated() < state.threshold && !state.deadline_passed() {
            self.reduced_search(state, &relaxed).await;
        }
    }

    /// Re-query discovery with only the core ingredients
    async fn reduced_search(&self, state: &mut RequestState, relaxed: &UserConstraints) {
        let stage = PipelineStage::SafetyOnly;
        let (partition, budget) = self
            .prioritizer
            .partition(state.constraints.ingredients(), state.budget, state.deadline)
            .await;
        state.budget = budget;
        if !partition.is_reducible() {
            debug!(
                reason = partition.fallback_reason.as_deref().unwrap_or("no secondary ingredients"),
                "Ingredient set cannot be reduced"
            );
            return;
        }

        let dropped = partition.secondary_names();
        let core_count = partition.core.len();
        let reduced = relaxed.with_reduced_ingredients(partition.core, dropped.clone());
        let ingredient_relaxation = RelaxedConstraint::IngredientSet {
            dropped: dropped.clone(),
        };
        state.notes.push(format!(
            "ingredient set reduced to {core_count} core ingredients (dropped: {})",
            dropped.join(", ")
        ));

        let query = DiscoveryQuery::from_constraints(&reduced, self.config.discovery_limit);
        let raws = self.discover(state, &query, stage).await;
        let admitted = self.admit(state, raws, CandidateOrigin::ReducedSearch, stage);
        for (id, evaluation) in admitted {
            if route_unsafe(state, &id, &evaluation, stage) {
                continue;
            }
            let mut relaxations = failure_relaxations(state, &id);
            relaxations.push(ingredient_relaxation.clone());
            log_tier_error(state.ledger.assign(
                &id,
                ConfidenceTier::Rescue,
                stage.as_str(),
                "found with a reduced ingredient set",
            ));
            state.relaxations.insert(id, relaxations);
        }
    }

    async fn arbiter_review_stage(&self, state: &mut RequestState) {
        self.resolve_safety_reviews(state).await;
        self.confirm_relaxed_tags(state).await;
    }

    /// NEEDS_REVIEW candidates: an accepted PASS earns RESCUE, anything else rejects
    async fn resolve_safety_reviews(&self, state: &mut RequestState) {
        let stage = PipelineStage::ArbiterReview;
        let acceptance = self.config.arbiter_acceptance;

        let mut safety_ids = mem::take(&mut state.safety_reviews);
        state.sort_by_fit(&mut safety_ids);
        let requests: Vec<ValidationRequest> = safety_ids
            .iter()
            .filter_map(|id| safety_request(state, id))
            .collect();
        let mut verdicts = self.run_reviews(state, &requests).await;

        for id in safety_ids {
            match verdicts.remove(&id).flatten() {
                Some(verdict) if verdict.accepts(acceptance) => {
                    let detail = format!(
                        "arbiter cleared safety ambiguity (confidence {:.2}): {}",
                        verdict.confidence(),
                        verdict.reason()
                    );
                    let failures = failure_relaxations(state, &id);
                    log_tier_error(state.ledger.assign(&id, ConfidenceTier::Rescue, stage.as_str(), detail));
                    if failures.is_empty() {
                        log_tier_error(state.ledger.upgrade(
                            &id,
                            stage.as_str(),
                            "safety confirmed and every tag met",
                        ));
                    }
                    state.relaxations.insert(id, failures);
                }
                Some(verdict) => log_tier_error(state.ledger.reject(
                    &id,
                    stage.as_str(),
                    format!(
                        "arbiter did not clear safety ambiguity ({:?}, confidence {:.2}): {}",
                        verdict.decision(),
                        verdict.confidence(),
                        verdict.reason()
                    ),
                )),
                None => log_tier_error(state.ledger.reject(
                    &id,
                    stage.as_str(),
                    "safety ambiguity unresolved; arbiter gave no usable verdict",
                )),
            }
        }
    }

    /// RESCUE candidates with failed tags: an accepted PASS earns UPGRADED
    async fn confirm_relaxed_tags(&self, state: &mut RequestState) {
        let stage = PipelineStage::ArbiterReview;
        let acceptance = self.config.arbiter_acceptance;

        let mut semantic_ids = semantic_review_ids(state);
        state.sort_by_fit(&mut semantic_ids);
        let requests: Vec<ValidationRequest> = semantic_ids
            .iter()
            .filter_map(|id| semantic_request(state, id))
            .collect();
        let mut verdicts = self.run_reviews(state, &requests).await;

        for id in semantic_ids {
            match verdicts.remove(&id).flatten() {
                Some(verdict) if verdict.accepts(acceptance) => {
                    log_tier_error(state.ledger.upgrade(
                        &id,
                        stage.as_str(),
                        format!(
                            "arbiter confirmed relaxed tags (confidence {:.2}): {}",
                            verdict.confidence(),
                            verdict.reason()
                        ),
                    ));
                    if let Some(relaxations) = state.relaxations.get_mut(&id) {
                        relaxations.retain(|r| !matches!(r, RelaxedConstraint::Tag { .. }));
                    }
                }
                Some(verdict) => debug!(
                    candidate_id = %id,
                    confidence = verdict.confidence(),
                    "Arbiter did not confirm tags, candidate stays RESCUE"
                ),
                None => debug!(candidate_id = %id, "No tag verdict, candidate stays RESCUE"),
            }
        }
    }

    async fn generation_stage(&self, state: &mut RequestState) {
        let stage = PipelineStage::ExternalGeneration;
        let shortfall = state.threshold.saturating_sub(state.validated());
        let request = GenerationRequest::from_constraints(
            &state.constraints,
            shortfall.max(self.config.generation_count),
        );
        let arbiter = self.arbiter.name().to_owned();
        let (result, budget) = call_with_retry(
            &arbiter,
            "generate",
            &self.config.retry,
            state.budget,
            state.deadline,
            || self.arbiter.generate(&request),
        )
        .await;
        state.budget = budget;

        let raws = match result {
            Ok(raws) => raws,
            Err(e) => {
                warn!(arbiter = %arbiter, error = %e, "Recipe generation failed");
                state.notes.push(format!("recipe generation unavailable: {e}"));
                return;
            }
        };

        let admitted = self.admit(state, raws, CandidateOrigin::Generated, stage);
        for (id, evaluation) in admitted {
            if evaluation.safety.is_reject() {
                log_tier_error(state.ledger.reject(&id, stage.as_str(), evaluation.safety.describe()));
                continue;
            }
            if evaluation.safety.requires_review() {
                log_tier_error(state.ledger.reject(
                    &id,
                    stage.as_str(),
                    format!(
                        "generated recipe needs safety review and no review stage remains: {}",
                        evaluation.safety.describe()
                    ),
                ));
                continue;
            }
            if evaluation.semantic_failures.is_empty() {
                log_tier_error(state.ledger.assign(
                    &id,
                    ConfidenceTier::Golden,
                    stage.as_str(),
                    "generated recipe passed safety and every tag",
                ));
            } else {
                let failures = failure_relaxations(state, &id);
                log_tier_error(state.ledger.assign(
                    &id,
                    ConfidenceTier::Rescue,
                    stage.as_str(),
                    "generated recipe passed safety with relaxed tags",
                ));
                state.relaxations.insert(id, failures);
            }
        }
    }

    /// Run reviews `review_concurrency` at a time, each with its own slice of the quota.
    ///
    /// Every review is bounded by the request deadline, so each batch settles
    /// and hands its unspent quota back. Reviews cut short count as no verdict
    /// and no further batch starts once the deadline has passed.
    async fn run_reviews(
        &self,
        state: &mut RequestState,
        requests: &[ValidationRequest],
    ) -> HashMap<String, Option<ArbiterVerdict>> {
        let mut verdicts = HashMap::with_capacity(requests.len());
        let concurrency = self.config.review_concurrency;
        let per_review = self.config.retry.max_attempts;

        for chunk in requests.chunks(concurrency) {
            if state.budget.is_exhausted() {
                warn!(remaining = chunk.len(), "Quota exhausted before every review ran");
                state.notes.push("collaborator quota exhausted during arbiter review".to_owned());
                state.degraded = true;
                break;
            }
            let mut calls = Vec::with_capacity(chunk.len());
            for request in chunk {
                let (reserved, rest) = state.budget.reserve(per_review);
                state.budget = rest;
                calls.push(self.review_one(request, reserved, state.deadline));
            }
            let results = stream::iter(calls)
                .buffer_unordered(concurrency)
                .collect::<Vec<_>>()
                .await;
            for (id, verdict, leftover) in results {
                state.budget = state.budget.merge(leftover);
                verdicts.insert(id, verdict);
            }
            if state.deadline_passed() {
                warn!("Request budget exhausted during arbiter review");
                state.notes.push("arbiter review cut short by the request budget".to_owned());
                state.degraded = true;
                break;
            }
        }
        verdicts
    }

    async fn review_one(
        &self,
        request: &ValidationRequest,
        budget: QuotaBudget,
        deadline: Instant,
    ) -> (String, Option<ArbiterVerdict>, QuotaBudget) {
        let (result, budget) = call_with_retry(
            self.arbiter.name(),
            "validate",
            &self.config.retry,
            budget,
            deadline,
            || self.arbiter.validate(request),
        )
        .await;
        let verdict = match result {
            Ok(verdict) => Some(verdict),
            Err(e) => {
                debug!(candidate_id = %request.candidate_id, error = %e, "Review produced no verdict");
                None
            }
        };
        (request.candidate_id.clone(), verdict, budget)
    }

    /// Search discovery and enrich summary records. Failures yield no records.
    async fn discover(
        &self,
        state: &mut RequestState,
        query: &DiscoveryQuery,
        stage: PipelineStage,
    ) -> Vec<RawRecipe> {
        let name = self.discovery.name().to_owned();
        let (result, budget) = call_with_retry(
            &name,
            "search",
            &self.config.retry,
            state.budget,
            state.deadline,
            || self.discovery.search(query),
        )
        .await;
        state.budget = budget;

        let mut records = match result {
            Ok(records) => records,
            Err(e) => {
                warn!(stage = stage.as_str(), error = %e, "Discovery search failed");
                state
                    .notes
                    .push(format!("discovery unavailable during {}: {e}", stage.as_str()));
                state.degraded = true;
                return Vec::new();
            }
        };

        let summary_ids: Vec<String> = records
            .iter()
            .filter(|r| r.is_summary())
            .filter_map(RawRecipe::key)
            .collect();
        if !summary_ids.is_empty() {
            let (result, budget) = call_with_retry(
                &name,
                "enrich",
                &self.config.retry,
                state.budget,
                state.deadline,
                || self.discovery.enrich(&summary_ids),
            )
            .await;
            state.budget = budget;
            match result {
                Ok(full) => {
                    let mut by_id: HashMap<String, RawRecipe> = full
                        .into_iter()
                        .filter_map(|r| r.key().map(|k| (k, r)))
                        .collect();
                    for record in &mut records {
                        if let Some(full) = record.key().and_then(|k| by_id.remove(&k)) {
                            *record = full;
                        }
                    }
                }
                Err(e) => {
                    warn!(stage = stage.as_str(), error = %e, "Enrichment failed");
                    state.notes.push(format!("enrichment unavailable during {}: {e}", stage.as_str()));
                    state.degraded = true;
                }
            }
        }

        let before = records.len();
        records.retain(|r| !r.is_summary());
        if records.len() < before {
            debug!(dropped = before - records.len(), "Dropped records without ingredient data");
        }
        records
    }

    /// Build, ingest, and evaluate records not yet seen in this request
    fn admit(
        &self,
        state: &mut RequestState,
        raws: Vec<RawRecipe>,
        origin: CandidateOrigin,
        stage: PipelineStage,
    ) -> Vec<(String, Evaluation)> {
        let source = match origin {
            CandidateOrigin::Generated => self.arbiter.name().to_owned(),
            CandidateOrigin::Discovery | CandidateOrigin::ReducedSearch => {
                self.discovery.name().to_owned()
            }
        };

        let mut fresh: Vec<Arc<Candidate>> = Vec::with_capacity(raws.len());
        for raw in raws {
            let candidate = match self.evaluator.normalizer().candidate(raw, origin, &source) {
                Ok(candidate) => candidate,
                Err(e) => {
                    warn!(error = %e, "Discarding malformed recipe record");
                    continue;
                }
            };
            if !state
                .ledger
                .ingest(&candidate.id, stage.as_str(), format!("from {}", origin.as_str()))
            {
                continue;
            }
            let candidate = Arc::new(candidate);
            state.candidates.insert(candidate.id.clone(), Arc::clone(&candidate));
            fresh.push(candidate);
        }

        let evaluations = self.evaluator.evaluate_batch(&fresh, &state.constraints);
        evaluations
            .into_iter()
            .map(|evaluation| {
                let id = evaluation.candidate_id.clone();
                state.evaluations.insert(id.clone(), evaluation.clone());
                (id, evaluation)
            })
            .collect()
    }
}

fn has_pending_reviews(state: &RequestState) -> bool {
    !state.safety_reviews.is_empty() || !semantic_review_ids(state).is_empty()
}

/// Reject unsafe candidates and queue ambiguous ones. Returns true if handled.
fn route_unsafe(
    state: &mut RequestState,
    id: &str,
    evaluation: &Evaluation,
    stage: PipelineStage,
) -> bool {
    if evaluation.safety.is_reject() {
        log_tier_error(state.ledger.reject(id, stage.as_str(), evaluation.safety.describe()));
        return true;
    }
    if evaluation.safety.requires_review() {
        debug!(candidate_id = id, reason = %evaluation.safety.describe(), "Queued for safety review");
        state.safety_reviews.push(id.to_owned());
        return true;
    }
    false
}

fn failure_relaxations(state: &RequestState, id: &str) -> Vec<RelaxedConstraint> {
    state
        .evaluations
        .get(id)
        .map(|e| {
            e.semantic_failures
                .iter()
                .cloned()
                .map(|tag| RelaxedConstraint::Tag { tag })
                .collect()
        })
        .unwrap_or_default()
}

fn semantic_review_ids(state: &RequestState) -> Vec<String> {
    state
        .ledger
        .tiered()
        .into_iter()
        .filter(|(id, tier)| {
            *tier == ConfidenceTier::Rescue
                && state
                    .evaluations
                    .get(id)
                    .is_some_and(|e| !e.semantic_failures.is_empty())
        })
        .map(|(id, _)| id)
        .collect()
}

fn safety_request(state: &RequestState, id: &str) -> Option<ValidationRequest> {
    let candidate = state.candidates.get(id)?;
    let evaluation = state.evaluations.get(id)?;
    let constraint = evaluation.safety.trigger.as_ref().map_or_else(
        || evaluation.safety.describe(),
        |t| {
            format!(
                "{}: is '{}' acceptable? (matched '{}')",
                t.rule, t.ingredient, t.keyword
            )
        },
    );
    Some(ValidationRequest {
        candidate_id: id.to_owned(),
        title: candidate.title.clone(),
        ingredients: candidate.ingredient_names(),
        constraint,
        kind: ReviewKind::Safety,
    })
}

fn semantic_request(state: &RequestState, id: &str) -> Option<ValidationRequest> {
    let candidate = state.candidates.get(id)?;
    let evaluation = state.evaluations.get(id)?;
    let constraint = evaluation
        .semantic_failures
        .iter()
        .map(|tag| tag.describe())
        .collect::<Vec<_>>()
        .join("; ");
    Some(ValidationRequest {
        candidate_id: id.to_owned(),
        title: candidate.title.clone(),
        ingredients: candidate.ingredient_names(),
        constraint,
        kind: ReviewKind::Semantic,
    })
}

/// Settle everything untiered and rank the rest.
///
/// Unresolved safety ambiguity is rejected. Safe candidates that were never
/// needed stay untiered and are only marked as set aside.
fn finish(mut state: RequestState) -> PipelineOutcome {
    let done = PipelineStage::Done.as_str();
    for id in state.ledger.pending_ids() {
        let safety = state.evaluations.get(&id).map(|e| &e.safety);
        if safety.is_some_and(SafetyOutcome::is_pass) {
            log_tier_error(state.ledger.set_aside(
                &id,
                done,
                "passed safety but was not needed; enough candidates were tiered first",
            ));
            continue;
        }
        let detail = if safety.is_some_and(SafetyOutcome::requires_review) {
            "safety ambiguity never resolved (fail closed)"
        } else {
            "not tiered before the request finished"
        };
        log_tier_error(state.ledger.reject(&id, done, detail));
    }

    let mut ranked = state.ledger.tiered();
    ranked.sort_by(|(a_id, a_tier), (b_id, b_tier)| {
        b_tier
            .cmp(a_tier)
            .then_with(|| state.fit_of(b_id).total_cmp(&state.fit_of(a_id)))
            .then_with(|| a_id.cmp(b_id))
    });
    let ranked: Vec<String> = ranked
        .into_iter()
        .take(state.constraints.target_count())
        .map(|(id, _)| id)
        .collect();

    if ranked.is_empty() {
        state
            .notes
            .push("no safe candidate found".to_owned());
    }
    info!(
        returned = ranked.len(),
        seen = state.ledger.len(),
        budget_remaining = state.budget.remaining(),
        degraded = state.degraded,
        "Recommendation ready"
    );

    PipelineOutcome {
        constraints: state.constraints,
        ledger: state.ledger,
        candidates: state.candidates,
        evaluations: state.evaluations,
        relaxations: state.relaxations,
        ranked,
        trace: state.trace,
        notes: state.notes,
        budget: state.budget,
        degraded: state.degraded,
    }
}
