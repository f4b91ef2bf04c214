// ABOUTME: Tests for the file-backed discovery collaborator
// ABOUTME: File layouts, overlap ranking, tag filtering, summaries, and enrichment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::fs;
use std::path::PathBuf;

use common::strings;
use pantry_chef::collaborators::{DiscoveryQuery, FixtureDiscovery, RecipeDiscovery};
use pantry_core::models::RawRecipe;
use tempfile::TempDir;

const RECIPES_JSON: &str = r#"[
    {"id": 101, "title": "Tomato Basil Pasta", "readyInMinutes": 25,
     "extendedIngredients": [{"name": "pasta"}, {"name": "tomato"}, {"name": "basil"}],
     "cuisines": ["Italian"], "diets": ["lacto ovo vegetarian"]},
    {"id": 102, "title": "Tomato Salad",
     "extendedIngredients": [{"name": "tomatoes"}, {"name": "cucumber"}],
     "cuisines": ["Greek"], "vegetarian": true},
    {"id": 103, "title": "Beef Stew",
     "extendedIngredients": [{"name": "beef"}, {"name": "carrot"}]}
]"#;

fn query(ingredients: &[&str]) -> DiscoveryQuery {
    DiscoveryQuery {
        ingredients: strings(ingredients),
        cuisine: None,
        meal_type: None,
        diets: Vec::new(),
        intolerances: Vec::new(),
        limit: 10,
    }
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn keys(recipes: &[RawRecipe]) -> Vec<String> {
    recipes.iter().filter_map(RawRecipe::key).collect()
}

#[tokio::test]
async fn test_loads_bare_array_and_envelope_files() {
    common::init_test_logging();
    let dir = TempDir::new().unwrap();

    let list = write_file(&dir, "list.json", RECIPES_JSON);
    let discovery = FixtureDiscovery::from_path(&list).await.unwrap();
    assert_eq!(discovery.len(), 3);

    let envelope = write_file(
        &dir,
        "envelope.json",
        &format!(r#"{{"results": {RECIPES_JSON}, "totalResults": 3}}"#),
    );
    let discovery = FixtureDiscovery::from_path(&envelope).await.unwrap();
    assert_eq!(discovery.len(), 3);
}

#[tokio::test]
async fn test_missing_or_malformed_files_fail() {
    let dir = TempDir::new().unwrap();
    assert!(FixtureDiscovery::from_path(dir.path().join("absent.json"))
        .await
        .is_err());

    let bad = write_file(&dir, "bad.json", r#"{"recipes": "nope"}"#);
    assert!(FixtureDiscovery::from_path(&bad).await.is_err());
}

#[tokio::test]
async fn test_search_ranks_by_overlap_and_skips_unrelated() {
    let discovery: Vec<RawRecipe> = serde_json::from_str(RECIPES_JSON).unwrap();
    let discovery = FixtureDiscovery::from_recipes(discovery);

    let results = discovery
        .search(&query(&["tomato", "basil"]))
        .await
        .unwrap();
    assert_eq!(keys(&results), vec!["101", "102"]);

    let limited = discovery
        .search(&DiscoveryQuery {
            limit: 1,
            ..query(&["tomato", "basil"])
        })
        .await
        .unwrap();
    assert_eq!(keys(&limited), vec!["101"]);
}

#[tokio::test]
async fn test_search_applies_tag_filters() {
    let recipes: Vec<RawRecipe> = serde_json::from_str(RECIPES_JSON).unwrap();
    let discovery = FixtureDiscovery::from_recipes(recipes);

    let italian = discovery
        .search(&DiscoveryQuery {
            cuisine: Some("italian".to_owned()),
            ..query(&["tomato"])
        })
        .await
        .unwrap();
    assert_eq!(keys(&italian), vec!["101"]);

    // The salad qualifies through its source flag
    let vegetarian = discovery
        .search(&DiscoveryQuery {
            diets: strings(&["vegetarian"]),
            ..query(&["tomato", "beef"])
        })
        .await
        .unwrap();
    assert_eq!(keys(&vegetarian), vec!["101", "102"]);
}

#[tokio::test]
async fn test_summaries_are_completed_by_enrich() {
    let recipes: Vec<RawRecipe> = serde_json::from_str(RECIPES_JSON).unwrap();
    let discovery = FixtureDiscovery::from_recipes(recipes).with_summaries();

    let summaries = discovery.search(&query(&["basil"])).await.unwrap();
    assert_eq!(keys(&summaries), vec!["101"]);
    assert!(summaries[0].is_summary());

    let full = discovery
        .enrich(&strings(&["101", "999"]))
        .await
        .unwrap();
    assert_eq!(keys(&full), vec!["101"]);
    assert_eq!(full[0].extended_ingredients.len(), 3);
}
