// ABOUTME: Tests for ingredient normalization, plural handling, and token matching
// ABOUTME: Covers measures, punctuation, qualifiers, staples, and candidate construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use pantry_core::models::{CandidateOrigin, Difficulty, RawIngredient, RawRecipe};
use pantry_intelligence::normalizer::singularize;
use pantry_intelligence::IngredientNormalizer;

// ============================================================================
// Text normalization
// ============================================================================

#[test]
fn test_normalize_strips_case_measures_and_punctuation() {
    let normalizer = IngredientNormalizer::new();
    assert_eq!(normalizer.normalize_text("2 Large Tomatoes,"), "large tomato");
    assert_eq!(normalizer.normalize_text("1 cup of Basil Leaves"), "basil leaf");
    assert_eq!(normalizer.normalize_text("  Garlic  "), "garlic");
    assert_eq!(normalizer.normalize_text("3 cloves garlic"), "garlic");
}

#[test]
fn test_normalize_removes_apostrophes() {
    let normalizer = IngredientNormalizer::new();
    assert_eq!(normalizer.normalize_text("Baker's Chocolate"), "baker chocolate");
}

#[test]
fn test_normalize_joins_free_and_non_qualifiers() {
    let normalizer = IngredientNormalizer::new();
    assert_eq!(normalizer.normalize_text("Dairy Free Yogurt"), "dairy-free yogurt");
    assert_eq!(normalizer.normalize_text("non dairy creamer"), "non-dairy creamer");
    assert_eq!(normalizer.normalize_text("gluten-free pasta"), "gluten-free pasta");
}

#[test]
fn test_normalize_keeps_original_text() {
    let normalizer = IngredientNormalizer::new();
    let token = normalizer.normalize("  2 Ripe Tomatoes ");
    assert_eq!(token.normalized(), "ripe tomato");
    assert_eq!(token.original(), "2 Ripe Tomatoes");
}

#[test]
fn test_normalize_of_measure_only_is_empty() {
    let normalizer = IngredientNormalizer::new();
    assert!(normalizer.normalize("2 cups").is_empty());
}

// ============================================================================
// Singularization
// ============================================================================

#[test]
fn test_singularize_regular_and_irregular_forms() {
    assert_eq!(singularize("tomatoes"), "tomato");
    assert_eq!(singularize("berries"), "berry");
    assert_eq!(singularize("peaches"), "peach");
    assert_eq!(singularize("radishes"), "radish");
    assert_eq!(singularize("boxes"), "box");
    assert_eq!(singularize("onions"), "onion");
    assert_eq!(singularize("leaves"), "leaf");
    assert_eq!(singularize("cookies"), "cookie");
}

#[test]
fn test_singularize_invariant_short_and_latin_words() {
    assert_eq!(singularize("hummus"), "hummus");
    assert_eq!(singularize("asparagus"), "asparagus");
    assert_eq!(singularize("molasses"), "molasses");
    assert_eq!(singularize("peas"), "pea");
    assert_eq!(singularize("egg"), "egg");
    assert_eq!(singularize("swiss"), "swiss");
    assert_eq!(singularize("hibiscus"), "hibiscus");
}

// ============================================================================
// Matching and staples
// ============================================================================

#[test]
fn test_matches_is_word_subset_in_either_direction() {
    let normalizer = IngredientNormalizer::new();
    let tomato = normalizer.normalize("tomato");
    let cherry = normalizer.normalize("cherry tomatoes");
    let potato = normalizer.normalize("potato");

    assert!(normalizer.matches(&tomato, &cherry));
    assert!(normalizer.matches(&cherry, &tomato));
    assert!(!normalizer.matches(&tomato, &potato));
}

#[test]
fn test_matches_ignores_empty_tokens() {
    let normalizer = IngredientNormalizer::new();
    let empty = normalizer.normalize("1 cup");
    let rice = normalizer.normalize("rice");
    assert!(!normalizer.matches(&empty, &rice));
}

#[test]
fn test_token_equality_uses_normalized_form() {
    let normalizer = IngredientNormalizer::new();
    assert_eq!(normalizer.normalize("Tomatoes"), normalizer.normalize("tomato"));
}

#[test]
fn test_staples_are_recognized_after_normalization() {
    let normalizer = IngredientNormalizer::new();
    assert!(normalizer.is_staple(&normalizer.normalize("Olive Oil")));
    assert!(normalizer.is_staple(&normalizer.normalize("1 tsp salt")));
    assert!(normalizer.is_staple(&normalizer.normalize("Water")));
    assert!(!normalizer.is_staple(&normalizer.normalize("basil")));
}

// ============================================================================
// Candidate construction
// ============================================================================

#[test]
fn test_candidate_skips_blank_ingredient_lines() {
    let normalizer = IngredientNormalizer::new();
    let mut raw = RawRecipe::new("r1", "Toast").with_ingredients(&["bread", "butter"]);
    raw.extended_ingredients.push(RawIngredient::default());
    raw.extended_ingredients.push(RawIngredient::named("2 cups"));

    let candidate = normalizer
        .candidate(raw, CandidateOrigin::Discovery, "test")
        .unwrap();
    assert_eq!(candidate.ingredients.len(), 2);
    assert_eq!(candidate.ingredient_names(), vec!["bread", "butter"]);
}

#[test]
fn test_candidate_prefers_name_over_original_line() {
    let normalizer = IngredientNormalizer::new();
    let mut raw = RawRecipe::new("r1", "Smoothie");
    raw.extended_ingredients.push(RawIngredient {
        name: Some("almond milk".to_owned()),
        original: Some("1 cup unsweetened almond milk".to_owned()),
    });

    let candidate = normalizer
        .candidate(raw, CandidateOrigin::Discovery, "test")
        .unwrap();
    assert_eq!(candidate.ingredients[0].normalized(), "almond milk");
    assert_eq!(candidate.ingredients[0].original(), "1 cup unsweetened almond milk");
}

#[test]
fn test_candidate_rejects_records_without_title() {
    let normalizer = IngredientNormalizer::new();
    let mut raw = RawRecipe::new("r1", "Soup");
    raw.title = Some("   ".to_owned());
    assert!(normalizer
        .candidate(raw, CandidateOrigin::Discovery, "test")
        .is_err());
}

#[test]
fn test_candidate_derives_difficulty() {
    let easy = common::candidate_with("a", "Salad", &["lettuce", "tomato"]);
    assert_eq!(easy.difficulty, Difficulty::Easy);

    let long = common::candidate(
        RawRecipe::new("b", "Stew")
            .with_ingredients(&["beef", "carrot"])
            .with_ready_in(120),
    );
    assert_eq!(long.difficulty, Difficulty::Medium);

    let many: Vec<String> = (0..11).map(|i| format!("spice {i}")).collect();
    let many_refs: Vec<&str> = many.iter().map(String::as_str).collect();
    let hard = common::candidate_with("c", "Curry", &many_refs);
    assert_eq!(hard.difficulty, Difficulty::Hard);
}
