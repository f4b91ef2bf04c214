// ABOUTME: Tests for constraint parsing, relaxation, semantic tags, and quota budgets
// ABOUTME: Invalid input is rejected up front; relaxation derives new values and records drops
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{candidate, parse_constraints, strings};
use pantry_chef::collaborators::{DiscoveryQuery, GenerationRequest};
use pantry_core::errors::EngineError;
use pantry_core::models::{
    ConstraintsRequest, DietaryRequirement, Intolerance, Mood, Profile, QuotaBudget, RawRecipe,
    RelaxedConstraint, SemanticTag, SourceFlags, UserConstraints,
};
use pantry_intelligence::{failed_tags, IngredientNormalizer};

fn try_parse(ingredients: &[&str], request: &ConstraintsRequest) -> Result<UserConstraints, EngineError> {
    let normalizer = IngredientNormalizer::new();
    UserConstraints::parse(&strings(ingredients), request, |raw| normalizer.normalize(raw))
}

fn italian_vegetarian() -> UserConstraints {
    parse_constraints(
        &["tomato", "basil"],
        &ConstraintsRequest {
            diets: strings(&["vegetarian"]),
            intolerances: strings(&["dairy"]),
            cuisine: Some(" Italian ".to_owned()),
            meal_type: Some("Main Course".to_owned()),
            ..ConstraintsRequest::default()
        },
    )
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_parse_normalizes_and_dedupes_ingredients() {
    let constraints = parse_constraints(
        &["Tomatoes", "tomato", "2 cups Basil", "  "],
        &ConstraintsRequest::default(),
    );
    let names: Vec<&str> = constraints
        .ingredients()
        .iter()
        .map(|t| t.normalized())
        .collect();
    assert_eq!(names, vec!["tomato", "basil"]);
    assert_eq!(constraints.ingredient_names(), vec!["Tomatoes", "2 cups Basil"]);
}

#[test]
fn test_parse_applies_defaults() {
    let constraints = parse_constraints(&["rice"], &ConstraintsRequest::default());
    assert_eq!(constraints.mood(), Mood::Casual);
    assert_eq!(constraints.profile(), Profile::Balanced);
    assert_eq!(constraints.target_count(), 10);
    assert!(constraints.diets().is_empty());
    assert!(constraints.relaxations().is_empty());
}

#[test]
fn test_parse_accepts_name_variants() {
    let constraints = parse_constraints(
        &["rice"],
        &ConstraintsRequest {
            diets: strings(&["Gluten Free", "gluten-free", "lacto ovo vegetarian"]),
            intolerances: strings(&["Dairy"]),
            mood: Some("TIRED".to_owned()),
            profile: Some("pantry-cleaner".to_owned()),
            ..ConstraintsRequest::default()
        },
    );
    assert_eq!(
        constraints.diets(),
        &[DietaryRequirement::GlutenFree, DietaryRequirement::Vegetarian]
    );
    assert_eq!(constraints.intolerances(), &[Intolerance::Dairy]);
    assert_eq!(constraints.mood(), Mood::Tired);
    assert_eq!(constraints.profile(), Profile::PantryCleaner);
}

#[test]
fn test_parse_rejects_empty_ingredient_list() {
    let err = try_parse(&[], &ConstraintsRequest::default()).unwrap_err();
    assert!(matches!(err, EngineError::InvalidConstraints(_)));
    assert!(!err.is_recoverable());

    assert!(try_parse(&["   ", "1 cup"], &ConstraintsRequest::default()).is_err());
}

#[test]
fn test_parse_never_ignores_unknown_safety_rules() {
    let err = try_parse(
        &["rice"],
        &ConstraintsRequest {
            intolerances: strings(&["sesame"]),
            ..ConstraintsRequest::default()
        },
    )
    .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidConstraints("unknown intolerance 'sesame'".to_owned())
    );

    assert!(try_parse(
        &["rice"],
        &ConstraintsRequest {
            diets: strings(&["carnivore"]),
            ..ConstraintsRequest::default()
        },
    )
    .is_err());
}

#[test]
fn test_parse_rejects_out_of_range_numbers_and_unknown_names() {
    let bad_requests = [
        ConstraintsRequest {
            skill_level: Some(101),
            ..ConstraintsRequest::default()
        },
        ConstraintsRequest {
            target_count: Some(0),
            ..ConstraintsRequest::default()
        },
        ConstraintsRequest {
            target_count: Some(51),
            ..ConstraintsRequest::default()
        },
        ConstraintsRequest {
            mood: Some("hangry".to_owned()),
            ..ConstraintsRequest::default()
        },
        ConstraintsRequest {
            max_difficulty: Some("expert".to_owned()),
            ..ConstraintsRequest::default()
        },
    ];
    for request in &bad_requests {
        assert!(try_parse(&["rice"], request).is_err(), "{request:?} should fail");
    }
}

#[test]
fn test_request_accepts_single_string_or_list() {
    let request: ConstraintsRequest = serde_json::from_str(
        r#"{"diet": "vegan", "intolerances": ["nut", "gluten"], "target_count": 3}"#,
    )
    .unwrap();
    assert_eq!(request.diets, vec!["vegan"]);
    assert_eq!(request.intolerances, vec!["nut", "gluten"]);
    assert_eq!(request.target_count, Some(3));
}

// ============================================================================
// Semantic requirements and relaxation
// ============================================================================

#[test]
fn test_semantic_requirements_include_cuisine_meal_and_diet_labels() {
    let constraints = italian_vegetarian();
    assert_eq!(constraints.cuisine(), Some("italian"));
    assert_eq!(constraints.meal_type(), Some("main course"));
    assert_eq!(
        constraints.semantic_requirements(),
        vec![
            SemanticTag::Cuisine("italian".to_owned()),
            SemanticTag::MealType("main course".to_owned()),
            SemanticTag::Diet(DietaryRequirement::Vegetarian),
        ]
    );
}

#[test]
fn test_safety_only_drops_tags_and_keeps_every_safety_rule() {
    let original = italian_vegetarian();
    let relaxed = original.safety_only();

    assert!(relaxed.semantic_requirements().is_empty());
    assert_eq!(relaxed.diets(), original.diets());
    assert_eq!(relaxed.intolerances(), original.intolerances());
    assert_eq!(relaxed.relaxations().len(), 3);
    assert_eq!(
        relaxed.relaxations()[0],
        RelaxedConstraint::Tag {
            tag: SemanticTag::Cuisine("italian".to_owned())
        }
    );
    // The original value is untouched
    assert_eq!(original.cuisine(), Some("italian"));
    assert!(original.relaxations().is_empty());
}

#[test]
fn test_reduced_ingredients_records_what_was_dropped() {
    let normalizer = IngredientNormalizer::new();
    let original = parse_constraints(&["chicken", "rice", "cumin"], &ConstraintsRequest::default());
    let reduced = original.with_reduced_ingredients(
        vec![normalizer.normalize("chicken"), normalizer.normalize("rice")],
        strings(&["cumin"]),
    );

    assert_eq!(reduced.ingredients().len(), 2);
    assert_eq!(
        reduced.relaxations(),
        &[RelaxedConstraint::IngredientSet {
            dropped: strings(&["cumin"])
        }]
    );
    assert_eq!(
        reduced.relaxations()[0].describe(),
        "searched without: cumin"
    );

    let unchanged = original.with_reduced_ingredients(Vec::new(), strings(&["cumin"]));
    assert_eq!(unchanged.ingredients().len(), 3);
    assert!(unchanged.relaxations().is_empty());
}

#[test]
fn test_failed_tags_reads_labels_and_source_flags() {
    let constraints = italian_vegetarian();
    let requirements = constraints.semantic_requirements();

    let tagged = candidate(
        RawRecipe::new("t", "Margherita")
            .with_ingredients(&["tomato", "basil"])
            .with_cuisines(&["Italian", "Mediterranean"])
            .with_dish_types(&["lunch", "main course"])
            .with_diets(&["lacto ovo vegetarian"]),
    );
    assert!(failed_tags(&tagged, &requirements).is_empty());

    let flagged = candidate(
        RawRecipe::new("f", "Tomato Soup")
            .with_ingredients(&["tomato"])
            .with_dish_types(&["main course"])
            .with_flags(SourceFlags {
                vegan: Some(true),
                ..SourceFlags::default()
            }),
    );
    assert_eq!(
        failed_tags(&flagged, &requirements),
        vec![SemanticTag::Cuisine("italian".to_owned())]
    );
}

// ============================================================================
// Collaborator requests
// ============================================================================

#[test]
fn test_discovery_query_carries_only_enforced_tags() {
    let constraints = italian_vegetarian();
    let strict = DiscoveryQuery::from_constraints(&constraints, 20);
    assert_eq!(strict.cuisine.as_deref(), Some("italian"));
    assert_eq!(strict.diets, vec!["vegetarian"]);
    assert_eq!(strict.intolerances, vec!["dairy"]);
    assert!(strict.has_tags());

    let relaxed = DiscoveryQuery::from_constraints(&constraints.safety_only(), 20);
    assert!(!relaxed.has_tags());
    assert_eq!(relaxed.intolerances, vec!["dairy"]);
    assert_eq!(relaxed.ingredients, strings(&["tomato", "basil"]));
}

#[test]
fn test_generation_request_keeps_every_original_constraint() {
    let constraints = italian_vegetarian();
    let request = GenerationRequest::from_constraints(&constraints, 3);
    assert_eq!(request.diets, vec!["vegetarian"]);
    assert_eq!(request.intolerances, vec!["dairy"]);
    assert_eq!(request.cuisine.as_deref(), Some("italian"));
    assert_eq!(request.count, 3);
}

// ============================================================================
// Quota budget
// ============================================================================

#[test]
fn test_quota_spend_until_exhausted() {
    let budget = QuotaBudget::new(2);
    let budget = budget.spend().unwrap().spend().unwrap();
    assert!(budget.is_exhausted());
    assert_eq!(budget.spent(), 2);
    assert!(budget.spend().is_none());
}

#[test]
fn test_quota_reserve_and_merge_conserve_calls() {
    let budget = QuotaBudget::new(5);
    let (reserved, rest) = budget.reserve(3);
    assert_eq!(reserved.remaining(), 3);
    assert_eq!(rest.remaining(), 2);

    let used = reserved.spend().unwrap();
    let merged = rest.merge(used);
    assert_eq!(merged.remaining(), 4);
    assert_eq!(merged.spent(), 1);

    let (granted, empty) = QuotaBudget::new(1).reserve(10);
    assert_eq!(granted.remaining(), 1);
    assert!(empty.is_exhausted());
}
