// ABOUTME: Tests for substitution advice on returned recipes' missing ingredients
// ABOUTME: Safety screening of stand-ins, item limits, collaborator failures, and lookup errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::{strings, test_config, ScriptedArbiter};
use pantry_chef::collaborators::{FixtureDiscovery, HeuristicArbiter, RecipeArbiter};
use pantry_chef::config::EngineConfig;
use pantry_chef::{Recommendation, RecommendationEngine};
use pantry_core::errors::ErrorCode;
use pantry_core::models::{ConstraintsRequest, RawRecipe};

fn request() -> ConstraintsRequest {
    ConstraintsRequest {
        diets: strings(&["vegetarian"]),
        intolerances: strings(&["dairy"]),
        ..ConstraintsRequest::default()
    }
}

fn pantry() -> Vec<String> {
    strings(&["tomato", "basil"])
}

/// One safe recipe missing pasta, spinach, mushroom, and zucchini
fn loaded_pasta() -> RawRecipe {
    RawRecipe::new("loaded-pasta", "Loaded Tomato Pasta")
        .with_ingredients(&[
            "pasta",
            "tomato",
            "basil",
            "olive oil",
            "spinach",
            "mushroom",
            "zucchini",
        ])
        .with_diets(&["lacto ovo vegetarian"])
}

fn config() -> EngineConfig {
    EngineConfig {
        min_validated: 1,
        ..test_config()
    }
}

async fn recommend(
    config: EngineConfig,
    arbiter: Arc<dyn RecipeArbiter>,
) -> (RecommendationEngine, Recommendation) {
    let engine = RecommendationEngine::new(
        config,
        Arc::new(FixtureDiscovery::from_recipes(vec![loaded_pasta()])),
        arbiter,
    )
    .unwrap();
    let recommendation = engine.recommend(&pantry(), &request()).await.unwrap();
    assert_eq!(recommendation.items.len(), 1);
    (engine, recommendation)
}

#[tokio::test]
async fn test_missing_ingredients_are_recorded_in_recipe_order() {
    common::init_test_logging();
    let (_, recommendation) = recommend(config(), Arc::new(ScriptedArbiter::new())).await;
    let score = recommendation.explain("loaded-pasta").unwrap().score.unwrap();
    assert_eq!(score.missing, vec!["pasta", "spinach", "mushroom", "zucchini"]);
    assert_eq!(score.missed_count, 4);
}

#[tokio::test]
async fn test_substitutes_are_suggested_under_request_constraints() {
    let arbiter = Arc::new(
        ScriptedArbiter::new()
            .with_substitute("pasta", "zucchini noodles")
            .with_substitute("spinach", "kale"),
    );
    let (engine, recommendation) = recommend(config(), arbiter.clone()).await;

    let report = engine
        .suggest_substitutions(&recommendation, "loaded-pasta")
        .await
        .unwrap();

    let substitutes: Vec<&str> = report
        .suggestions
        .iter()
        .map(|s| s.substitute.as_str())
        .collect();
    assert_eq!(substitutes, vec!["zucchini noodles", "kale"]);
    assert_eq!(report.unavailable.len(), 1);
    assert_eq!(report.unavailable[0].missing_item, "mushroom");

    let requests = arbiter.substitution_requests.lock().unwrap();
    assert_eq!(requests[0].recipe_title, "Loaded Tomato Pasta");
    assert_eq!(requests[0].pantry, vec!["tomato", "basil"]);
    assert_eq!(requests[0].diets, vec!["vegetarian"]);
    assert_eq!(requests[0].intolerances, vec!["dairy"]);
}

#[tokio::test]
async fn test_unsafe_substitutes_are_dropped() {
    let arbiter = Arc::new(
        ScriptedArbiter::new()
            .with_substitute("pasta", "parmesan crisps")
            .with_substitute("spinach", "bacon bits")
            .with_substitute("mushroom", "coconut milk"),
    );
    let (engine, recommendation) = recommend(config(), arbiter).await;

    let report = engine
        .suggest_substitutions(&recommendation, "loaded-pasta")
        .await
        .unwrap();

    assert!(report.is_empty());
    let reasons: Vec<&str> = report.unavailable.iter().map(|u| u.reason.as_str()).collect();
    assert!(reasons[0].contains("REJECT"));
    assert!(reasons[1].contains("REJECT"));
    assert!(reasons[2].contains("NEEDS_REVIEW"));
}

#[tokio::test]
async fn test_substitution_limit_caps_arbiter_calls() {
    let arbiter = Arc::new(ScriptedArbiter::new().with_substitute("pasta", "rice"));
    let config = EngineConfig {
        substitution_limit: 2,
        ..config()
    };
    let (engine, recommendation) = recommend(config, arbiter.clone()).await;

    let report = engine
        .suggest_substitutions(&recommendation, "loaded-pasta")
        .await
        .unwrap();

    assert_eq!(arbiter.suggest_calls.load(Ordering::SeqCst), 2);
    assert_eq!(report.suggestions.len(), 1);
    assert_eq!(report.unavailable.len(), 1);
}

#[tokio::test]
async fn test_offline_arbiter_offers_no_substitutes() {
    let (engine, recommendation) = recommend(config(), Arc::new(HeuristicArbiter::new())).await;

    let report = engine
        .suggest_substitutions(&recommendation, "loaded-pasta")
        .await
        .unwrap();

    assert!(report.is_empty());
    assert_eq!(report.unavailable.len(), 3);
    assert!(report.unavailable[0].reason.contains("not supported"));
    assert_eq!(report.budget_remaining, test_config().quota_per_request - 3);
}

#[tokio::test]
async fn test_unreturned_candidate_is_not_found() {
    let (engine, recommendation) = recommend(config(), Arc::new(ScriptedArbiter::new())).await;

    let err = engine
        .suggest_substitutions(&recommendation, "no-such-recipe")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}
