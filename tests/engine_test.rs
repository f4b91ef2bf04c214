// ABOUTME: End-to-end tests for the recommendation engine over fixture and scripted collaborators
// ABOUTME: Stage progression, fail-closed safety review, degradation, generation, and explanations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::{strings, test_config, Answer, FailingDiscovery, ScriptedArbiter};
use pantry_chef::collaborators::{
    ArbiterDecision, DiscoveryQuery, FixtureDiscovery, RecipeDiscovery, ReviewKind,
};
use pantry_chef::config::EngineConfig;
use pantry_chef::{PipelineStage, Recommendation, RecommendationEngine};
use pantry_core::errors::{CollaboratorError, ErrorCode};
use pantry_core::models::{
    CandidateOrigin, ConfidenceTier, ConstraintsRequest, RawRecipe, SourceFlags, TierStatus,
};
use pantry_intelligence::ProvenanceKind;
use tokio::time::{sleep, Instant};

fn italian_vegetarian_request() -> ConstraintsRequest {
    ConstraintsRequest {
        diets: strings(&["vegetarian"]),
        intolerances: strings(&["dairy"]),
        cuisine: Some("italian".to_owned()),
        ..ConstraintsRequest::default()
    }
}

fn pantry() -> Vec<String> {
    strings(&["tomato", "basil"])
}

/// Golden, unsafe, off-cuisine, and ambiguous recipes for a tomato/basil pantry
fn italian_recipes() -> Vec<RawRecipe> {
    vec![
        RawRecipe::new("caprese-pasta", "Tomato Basil Pasta")
            .with_ingredients(&["pasta", "tomato", "basil", "olive oil"])
            .with_ready_in(25)
            .with_cuisines(&["Italian"])
            .with_diets(&["lacto ovo vegetarian"]),
        RawRecipe::new("chicken-parm", "Chicken Parmesan")
            .with_ingredients(&["chicken breast", "tomato", "basil", "parmesan"])
            .with_cuisines(&["Italian"]),
        RawRecipe::new("tomato-soup", "Tomato Soup")
            .with_ingredients(&["tomato", "basil", "garlic"])
            .with_flags(SourceFlags {
                vegetarian: Some(true),
                ..SourceFlags::default()
            }),
        RawRecipe::new("creamy-tomato", "Creamy Tomato Bake")
            .with_ingredients(&["tomato", "basil", "almond milk"])
            .with_cuisines(&["Italian"])
            .with_diets(&["lacto ovo vegetarian"]),
    ]
}

fn generated_recipes() -> Vec<RawRecipe> {
    vec![
        RawRecipe::new("gen-bruschetta", "Bruschetta")
            .with_ingredients(&["bread", "tomato", "basil"])
            .with_cuisines(&["Italian"])
            .with_diets(&["vegetarian"]),
        RawRecipe::new("gen-blt", "Tomato Bacon Toast")
            .with_ingredients(&["bread", "bacon", "tomato", "basil"])
            .with_cuisines(&["Italian"]),
    ]
}

fn engine(
    config: EngineConfig,
    discovery: Arc<dyn RecipeDiscovery>,
    arbiter: Arc<ScriptedArbiter>,
) -> RecommendationEngine {
    RecommendationEngine::new(config, discovery, arbiter).unwrap()
}

fn tiers(recommendation: &Recommendation) -> Vec<ConfidenceTier> {
    recommendation.items.iter().map(|item| item.tier).collect()
}

fn ids(recommendation: &Recommendation) -> Vec<&str> {
    recommendation.items.iter().map(|item| item.id.as_str()).collect()
}

/// Discovery that only answers once the ingredient list is short enough
struct ShortListDiscovery {
    max_ingredients: usize,
    recipes: Vec<RawRecipe>,
    searches: AtomicUsize,
}

#[async_trait]
impl RecipeDiscovery for ShortListDiscovery {
    fn name(&self) -> &str {
        "short-list-discovery"
    }

    async fn search(&self, query: &DiscoveryQuery) -> Result<Vec<RawRecipe>, CollaboratorError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        if query.ingredients.len() > self.max_ingredients {
            return Ok(Vec::new());
        }
        Ok(self.recipes.clone())
    }

    async fn enrich(&self, _ids: &[String]) -> Result<Vec<RawRecipe>, CollaboratorError> {
        Ok(Vec::new())
    }
}

/// Discovery that never answers
struct HangingDiscovery;

#[async_trait]
impl RecipeDiscovery for HangingDiscovery {
    fn name(&self) -> &str {
        "hanging-discovery"
    }

    async fn search(&self, _query: &DiscoveryQuery) -> Result<Vec<RawRecipe>, CollaboratorError> {
        sleep(Duration::from_secs(3_600)).await;
        Ok(Vec::new())
    }

    async fn enrich(&self, _ids: &[String]) -> Result<Vec<RawRecipe>, CollaboratorError> {
        Ok(Vec::new())
    }
}

// ============================================================================
// Full pipeline
// ============================================================================

#[tokio::test]
async fn test_full_pipeline_ranks_by_tier_then_fit() {
    common::init_test_logging();
    let arbiter = Arc::new(
        ScriptedArbiter::new()
            .answer_for("creamy-tomato", Answer::Verdict(ArbiterDecision::Pass, 0.9))
            .with_generated(generated_recipes()),
    );
    let engine = engine(
        test_config(),
        Arc::new(FixtureDiscovery::from_recipes(italian_recipes())),
        arbiter.clone(),
    );

    let recommendation = engine
        .recommend(&pantry(), &italian_vegetarian_request())
        .await
        .unwrap();

    assert_eq!(
        tiers(&recommendation),
        vec![
            ConfidenceTier::Golden,
            ConfidenceTier::Golden,
            ConfidenceTier::Upgraded,
            ConfidenceTier::Rescue
        ]
    );
    let returned = ids(&recommendation);
    assert!(returned[..2].contains(&"caprese-pasta"));
    assert!(returned[..2].contains(&"gen-bruschetta"));
    assert_eq!(returned[2], "creamy-tomato");
    assert_eq!(returned[3], "tomato-soup");
    assert!(!recommendation.degraded);

    let soup = &recommendation.items[3];
    assert_eq!(soup.relaxed_constraints, vec!["relaxed cuisine: italian"]);
    assert!((soup.tier_value - 0.6).abs() < f64::EPSILON);

    let bruschetta = recommendation
        .items
        .iter()
        .find(|item| item.id == "gen-bruschetta")
        .unwrap();
    assert_eq!(bruschetta.origin, CandidateOrigin::Generated);

    assert_eq!(
        recommendation.trace.stages(),
        vec![
            PipelineStage::Strict,
            PipelineStage::SafetyOnly,
            PipelineStage::ArbiterReview,
            PipelineStage::ExternalGeneration,
            PipelineStage::Done
        ]
    );
    assert!(recommendation.trace.is_forward_only());
    assert_eq!(arbiter.generate_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_vegetarian_only_catalog_is_rescued_then_upgraded() {
    let recipes: Vec<RawRecipe> = (1..=5)
        .map(|n| {
            RawRecipe::new(format!("veg-{n}"), format!("Vegetable Plate {n}"))
                .with_ingredients(&["tomato", "basil", "zucchini"])
                .with_diets(&["vegetarian"])
        })
        .collect();
    let arbiter = Arc::new(
        ScriptedArbiter::new()
            .answer_for("veg-2", Answer::Verdict(ArbiterDecision::Pass, 0.95))
            .answer_for("veg-4", Answer::Verdict(ArbiterDecision::Pass, 0.8)),
    );
    let engine = engine(
        test_config(),
        Arc::new(FixtureDiscovery::from_recipes(recipes)),
        arbiter.clone(),
    );
    let request = ConstraintsRequest {
        diets: strings(&["vegetarian"]),
        cuisine: Some("italian".to_owned()),
        ..ConstraintsRequest::default()
    };

    let recommendation = engine.recommend(&pantry(), &request).await.unwrap();

    assert_eq!(
        tiers(&recommendation),
        vec![
            ConfidenceTier::Upgraded,
            ConfidenceTier::Upgraded,
            ConfidenceTier::Rescue,
            ConfidenceTier::Rescue,
            ConfidenceTier::Rescue
        ]
    );
    let returned = ids(&recommendation);
    assert!(returned[..2].contains(&"veg-2"));
    assert!(returned[..2].contains(&"veg-4"));
    assert!(recommendation.items[0].relaxed_constraints.is_empty());
    assert_eq!(
        recommendation.items[4].relaxed_constraints,
        vec!["relaxed cuisine: italian"]
    );

    // Five validated after review, so generation is skipped
    assert_eq!(
        recommendation.trace.stages(),
        vec![
            PipelineStage::Strict,
            PipelineStage::SafetyOnly,
            PipelineStage::ArbiterReview,
            PipelineStage::Done
        ]
    );
    assert_eq!(arbiter.validations(), 5);
    assert_eq!(arbiter.generate_calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        recommendation.explain("veg-2").unwrap().history.last().unwrap().kind,
        ProvenanceKind::Upgraded
    );
}

#[tokio::test]
async fn test_returned_candidates_never_violate_safety() {
    let arbiter = Arc::new(
        ScriptedArbiter::new()
            .answer_for("creamy-tomato", Answer::Verdict(ArbiterDecision::Pass, 0.9))
            .with_generated(generated_recipes()),
    );
    let engine = engine(
        test_config(),
        Arc::new(FixtureDiscovery::from_recipes(italian_recipes())),
        arbiter,
    );
    let recommendation = engine
        .recommend(&pantry(), &italian_vegetarian_request())
        .await
        .unwrap();

    for item in &recommendation.items {
        let explanation = recommendation.explain(&item.id).unwrap();
        assert!(!explanation.safety.is_reject(), "{} was unsafe", item.id);
        assert_eq!(explanation.status, TierStatus::Tiered(item.tier));
    }
    let returned = ids(&recommendation);
    assert!(!returned.contains(&"chicken-parm"));
    assert!(!returned.contains(&"gen-blt"));
}

#[tokio::test]
async fn test_rejected_candidates_are_explained() {
    let arbiter = Arc::new(ScriptedArbiter::new().with_generated(generated_recipes()));
    let engine = engine(
        test_config(),
        Arc::new(FixtureDiscovery::from_recipes(italian_recipes())),
        arbiter,
    );
    let recommendation = engine
        .recommend(&pantry(), &italian_vegetarian_request())
        .await
        .unwrap();

    assert!(recommendation
        .evaluated_ids()
        .contains(&"chicken-parm".to_owned()));
    let chicken = recommendation.explain("chicken-parm").unwrap();
    assert_eq!(chicken.status, TierStatus::Rejected);
    assert!(chicken.safety.is_reject());
    assert!(chicken.score.is_none());
    let trigger = chicken.safety.trigger.unwrap();
    assert!(["chicken", "parmesan"].contains(&trigger.keyword.as_str()));

    let blt = recommendation.explain("gen-blt").unwrap();
    assert_eq!(blt.origin, CandidateOrigin::Generated);
    assert_eq!(blt.status, TierStatus::Rejected);

    assert!(recommendation.explain("never-seen").is_none());
}

// ============================================================================
// Safety review
// ============================================================================

#[tokio::test]
async fn test_arbiter_rejection_keeps_ambiguous_candidate_out() {
    let arbiter = Arc::new(ScriptedArbiter::new());
    let engine = engine(
        test_config(),
        Arc::new(FixtureDiscovery::from_recipes(italian_recipes())),
        arbiter.clone(),
    );
    let recommendation = engine
        .recommend(&pantry(), &italian_vegetarian_request())
        .await
        .unwrap();

    assert!(!ids(&recommendation).contains(&"creamy-tomato"));
    let creamy = recommendation.explain("creamy-tomato").unwrap();
    assert_eq!(creamy.status, TierStatus::Rejected);
    assert!(creamy.safety.requires_review());

    let seen = arbiter.seen.lock().unwrap().clone();
    let safety_review = seen
        .iter()
        .find(|r| r.candidate_id == "creamy-tomato")
        .unwrap();
    assert_eq!(safety_review.kind, ReviewKind::Safety);
    assert!(safety_review.constraint.contains("almond milk"));

    let semantic_review = seen
        .iter()
        .find(|r| r.candidate_id == "tomato-soup")
        .unwrap();
    assert_eq!(semantic_review.kind, ReviewKind::Semantic);
    assert_eq!(semantic_review.constraint, "cuisine: italian");
}

#[tokio::test]
async fn test_low_confidence_pass_does_not_clear_ambiguity() {
    let arbiter = Arc::new(
        ScriptedArbiter::new()
            .answer_for("creamy-tomato", Answer::Verdict(ArbiterDecision::Pass, 0.75)),
    );
    let engine = engine(
        test_config(),
        Arc::new(FixtureDiscovery::from_recipes(italian_recipes())),
        arbiter,
    );
    let recommendation = engine
        .recommend(&pantry(), &italian_vegetarian_request())
        .await
        .unwrap();

    assert_eq!(
        recommendation.explain("creamy-tomato").unwrap().status,
        TierStatus::Rejected
    );
}

#[tokio::test(start_paused = true)]
async fn test_hanging_arbiter_fails_closed() {
    let recipes: Vec<RawRecipe> = italian_recipes()
        .into_iter()
        .filter(|r| r.key().as_deref() == Some("creamy-tomato"))
        .collect();
    let arbiter = Arc::new(ScriptedArbiter::new().with_safety(Answer::Hang));
    let engine = engine(
        test_config(),
        Arc::new(FixtureDiscovery::from_recipes(recipes)),
        arbiter.clone(),
    );
    let recommendation = engine
        .recommend(&pantry(), &italian_vegetarian_request())
        .await
        .unwrap();

    assert!(recommendation.is_empty());
    assert!(recommendation
        .notes
        .contains(&"no safe candidate found".to_owned()));
    let creamy = recommendation.explain("creamy-tomato").unwrap();
    assert_eq!(creamy.status, TierStatus::Rejected);
    assert!(creamy.history.last().unwrap().detail.contains("unresolved"));
    // Both attempts timed out
    assert_eq!(arbiter.validations(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_review_cut_short_returns_unspent_quota() {
    let recipes: Vec<RawRecipe> = italian_recipes()
        .into_iter()
        .filter(|r| r.key().as_deref() == Some("creamy-tomato"))
        .collect();
    let mut config = test_config();
    config.retry.max_attempts = 3;
    config.request_budget_ms = 1_500;
    let arbiter = Arc::new(ScriptedArbiter::new().with_safety(Answer::Hang));
    let engine = engine(
        config,
        Arc::new(FixtureDiscovery::from_recipes(recipes)),
        arbiter.clone(),
    );
    let recommendation = engine
        .recommend(&pantry(), &italian_vegetarian_request())
        .await
        .unwrap();

    // One timed-out attempt, then the second is cut at the deadline; the
    // third reserved attempt is never made
    assert_eq!(arbiter.validations(), 2);
    // Two searches, one categorization, two validation attempts
    assert_eq!(recommendation.budget_remaining, 35);
    assert!(recommendation.degraded);
    assert!(recommendation
        .notes
        .contains(&"arbiter review cut short by the request budget".to_owned()));
    assert_eq!(
        recommendation.explain("creamy-tomato").unwrap().status,
        TierStatus::Rejected
    );
}

// ============================================================================
// Stage shortcuts and degradation
// ============================================================================

#[tokio::test]
async fn test_enough_golden_candidates_finish_after_strict() {
    let arbiter = Arc::new(ScriptedArbiter::new());
    let config = EngineConfig {
        min_validated: 1,
        ..test_config()
    };
    let engine = engine(
        config,
        Arc::new(FixtureDiscovery::from_recipes(italian_recipes())),
        arbiter.clone(),
    );
    let recommendation = engine
        .recommend(&pantry(), &italian_vegetarian_request())
        .await
        .unwrap();

    assert_eq!(
        recommendation.trace.stages(),
        vec![PipelineStage::Strict, PipelineStage::Done]
    );
    assert_eq!(ids(&recommendation), vec!["caprese-pasta"]);
    assert_eq!(arbiter.validations(), 0);
    assert_eq!(recommendation.budget_remaining, 39);

    let transition = &recommendation.trace.transitions()[0];
    assert_eq!(transition.golden, 1);
    assert_eq!(transition.threshold, 1);
}

#[tokio::test]
async fn test_unneeded_safe_candidates_are_set_aside_not_rejected() {
    let config = EngineConfig {
        min_validated: 1,
        ..test_config()
    };
    // Ignores tag filters, so tag-failing recipes reach STRICT
    let discovery = Arc::new(ShortListDiscovery {
        max_ingredients: 10,
        recipes: italian_recipes(),
        searches: AtomicUsize::new(0),
    });
    let engine = engine(config, discovery, Arc::new(ScriptedArbiter::new()));
    let recommendation = engine
        .recommend(&pantry(), &italian_vegetarian_request())
        .await
        .unwrap();

    assert_eq!(ids(&recommendation), vec!["caprese-pasta"]);

    let soup = recommendation.explain("tomato-soup").unwrap();
    assert_eq!(soup.status, TierStatus::Ingested);
    assert!(soup.safety.is_pass());
    let last = soup.history.last().unwrap();
    assert_eq!(last.kind, ProvenanceKind::SetAside);
    assert_eq!(last.stage, "DONE");

    let creamy = recommendation.explain("creamy-tomato").unwrap();
    assert_eq!(creamy.status, TierStatus::Rejected);
    assert!(creamy
        .history
        .last()
        .unwrap()
        .detail
        .contains("safety ambiguity never resolved"));
}

#[tokio::test]
async fn test_target_count_caps_results() {
    let arbiter = Arc::new(
        ScriptedArbiter::new()
            .answer_for("creamy-tomato", Answer::Verdict(ArbiterDecision::Pass, 0.9))
            .with_generated(generated_recipes()),
    );
    let engine = engine(
        test_config(),
        Arc::new(FixtureDiscovery::from_recipes(italian_recipes())),
        arbiter.clone(),
    );
    let request = ConstraintsRequest {
        target_count: Some(2),
        ..italian_vegetarian_request()
    };
    let recommendation = engine.recommend(&pantry(), &request).await.unwrap();

    // Threshold drops to the target, so review alone is enough and generation never runs
    assert_eq!(ids(&recommendation), vec!["caprese-pasta", "creamy-tomato"]);
    assert_eq!(
        tiers(&recommendation),
        vec![ConfidenceTier::Golden, ConfidenceTier::Upgraded]
    );
    assert!(!recommendation
        .trace
        .stages()
        .contains(&PipelineStage::ExternalGeneration));
    assert_eq!(arbiter.generate_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_discovery_outage_degrades_to_generation() {
    let discovery = Arc::new(FailingDiscovery::new(CollaboratorError::Unavailable(
        "recipe api down".to_owned(),
    )));
    let arbiter = Arc::new(ScriptedArbiter::new().with_generated(generated_recipes()));
    let engine = engine(test_config(), discovery.clone(), arbiter);

    let recommendation = engine
        .recommend(&pantry(), &italian_vegetarian_request())
        .await
        .unwrap();

    assert!(recommendation.degraded);
    assert!(recommendation
        .notes
        .iter()
        .any(|n| n.starts_with("discovery unavailable during STRICT")));
    assert_eq!(ids(&recommendation), vec!["gen-bruschetta"]);
    assert_eq!(recommendation.items[0].origin, CandidateOrigin::Generated);
    // Two attempts for each of the strict and tagless searches
    assert_eq!(discovery.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test(start_paused = true)]
async fn test_request_budget_cuts_pipeline_short() {
    let config = EngineConfig {
        request_budget_ms: 500,
        ..test_config()
    };
    let arbiter = Arc::new(ScriptedArbiter::new().with_generated(generated_recipes()));
    let engine = engine(config, Arc::new(HangingDiscovery), arbiter.clone());

    let recommendation = engine
        .recommend(&pantry(), &italian_vegetarian_request())
        .await
        .unwrap();

    assert!(recommendation.degraded);
    assert!(recommendation.is_empty());
    assert_eq!(
        recommendation.trace.stages(),
        vec![PipelineStage::Strict, PipelineStage::Done]
    );
    assert!(recommendation
        .notes
        .iter()
        .any(|n| n == "request budget of 500ms exhausted during STRICT"));
    assert_eq!(arbiter.generate_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_hanging_discovery_never_outlives_request_budget() {
    // Default retry policy: three 5s attempts would run far past the budget
    let config = EngineConfig {
        request_budget_ms: 1_000,
        ..EngineConfig::default()
    };
    let arbiter = Arc::new(ScriptedArbiter::new().with_generated(generated_recipes()));
    let engine = engine(config, Arc::new(HangingDiscovery), arbiter.clone());

    let started = Instant::now();
    let recommendation = engine
        .recommend(&pantry(), &italian_vegetarian_request())
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_millis(1_100));
    assert!(recommendation.degraded);
    assert!(recommendation.is_empty());
    assert!(recommendation
        .notes
        .iter()
        .any(|n| n.starts_with("discovery unavailable during STRICT: request deadline reached")));
    assert_eq!(arbiter.generate_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_reduced_ingredient_search_yields_rescue_candidates() {
    let discovery = Arc::new(ShortListDiscovery {
        max_ingredients: 2,
        recipes: vec![RawRecipe::new("chicken-rice", "Chicken and Rice")
            .with_ingredients(&["chicken thigh", "rice", "onion"])],
        searches: AtomicUsize::new(0),
    });
    let arbiter = Arc::new(ScriptedArbiter::new().with_categorization(&["chicken", "rice"], &["cumin"]));
    let engine = engine(test_config(), discovery.clone(), arbiter.clone());

    let recommendation = engine
        .recommend(
            &strings(&["chicken", "rice", "cumin"]),
            &ConstraintsRequest::default(),
        )
        .await
        .unwrap();

    assert_eq!(ids(&recommendation), vec!["chicken-rice"]);
    let item = &recommendation.items[0];
    assert_eq!(item.tier, ConfidenceTier::Rescue);
    assert_eq!(item.origin, CandidateOrigin::ReducedSearch);
    assert_eq!(item.relaxed_constraints, vec!["searched without: cumin"]);
    assert!(recommendation
        .notes
        .iter()
        .any(|n| n.starts_with("ingredient set reduced to 2 core ingredients")));
    assert_eq!(arbiter.categorize_calls.load(Ordering::SeqCst), 1);
    // No tags requested, so the tagless search is skipped
    assert_eq!(discovery.searches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_summary_records_are_enriched_before_evaluation() {
    let arbiter = Arc::new(ScriptedArbiter::new());
    let config = EngineConfig {
        min_validated: 1,
        ..test_config()
    };
    let engine = engine(
        config,
        Arc::new(FixtureDiscovery::from_recipes(italian_recipes()).with_summaries()),
        arbiter,
    );
    let recommendation = engine
        .recommend(&pantry(), &italian_vegetarian_request())
        .await
        .unwrap();

    assert_eq!(ids(&recommendation), vec!["caprese-pasta"]);
    let explanation = recommendation.explain("caprese-pasta").unwrap();
    assert!(explanation.score.is_some());
}

// ============================================================================
// Input and configuration errors
// ============================================================================

#[tokio::test]
async fn test_invalid_constraints_fail_the_request() {
    let engine = engine(
        test_config(),
        Arc::new(FixtureDiscovery::from_recipes(italian_recipes())),
        Arc::new(ScriptedArbiter::new()),
    );

    let err = engine
        .recommend(&[], &ConstraintsRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let err = engine
        .recommend(&pantry(), &common::intolerance_request(&["sesame"]))
        .await
        .unwrap_err();
    assert!(err.message.contains("sesame"));
}

#[test]
fn test_engine_rejects_invalid_configuration() {
    let config = EngineConfig {
        min_validated: 0,
        ..EngineConfig::default()
    };
    let result = RecommendationEngine::new(
        config,
        Arc::new(FixtureDiscovery::from_recipes(Vec::new())),
        Arc::new(ScriptedArbiter::new()),
    );
    assert!(result.is_err());
}
