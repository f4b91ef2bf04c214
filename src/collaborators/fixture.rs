// ABOUTME: Discovery collaborator backed by an in-memory or JSON-file recipe collection
// ABOUTME: Ranks records by normalized ingredient overlap and applies optional tag filters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::path::Path;

use async_trait::async_trait;
use pantry_core::errors::{AppError, AppResult, CollaboratorError};
use pantry_core::models::{
    CandidateOrigin, DietaryRequirement, IngredientToken, RawRecipe, SemanticTag,
};
use pantry_intelligence::{failed_tags, IngredientNormalizer};
use serde::Deserialize;
use tokio::fs;
use tracing::{debug, info};

use super::{DiscoveryQuery, RecipeDiscovery};

/// Accepted file layouts: a bare array or a search-response envelope
#[derive(Deserialize)]
#[serde(untagged)]
enum FixtureFile {
    List(Vec<RawRecipe>),
    Envelope { results: Vec<RawRecipe> },
}

/// Recipe database stand-in for offline runs and tests
#[derive(Debug, Clone)]
pub struct FixtureDiscovery {
    recipes: Vec<RawRecipe>,
    normalizer: IngredientNormalizer,
    summaries_only: bool,
}

impl FixtureDiscovery {
    /// Serve the given records
    #[must_use]
    pub fn from_recipes(recipes: Vec<RawRecipe>) -> Self {
        Self {
            recipes,
            normalizer: IngredientNormalizer::new(),
            summaries_only: false,
        }
    }

    /// Load records from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a recipe list
    pub async fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).await.map_err(|e| {
            AppError::invalid_input(format!("cannot read recipes file {}: {e}", path.display()))
        })?;
        let recipes = match serde_json::from_str::<FixtureFile>(&raw)? {
            FixtureFile::List(recipes) | FixtureFile::Envelope { results: recipes } => recipes,
        };
        info!(path = %path.display(), recipes = recipes.len(), "Loaded recipe fixtures");
        Ok(Self::from_recipes(recipes))
    }

    /// Return summaries from `search` so callers must `enrich`
    #[must_use]
    pub const fn with_summaries(mut self) -> Self {
        self.summaries_only = true;
        self
    }

    /// Number of records served
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// True when no records are loaded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    fn overlap(&self, recipe: &RawRecipe, wanted: &[IngredientToken]) -> usize {
        recipe
            .extended_ingredients
            .iter()
            .filter_map(|i| self.normalizer.token_for(i))
            .filter(|have| wanted.iter().any(|w| self.normalizer.matches(w, have)))
            .count()
    }

    fn matches_tags(&self, recipe: &RawRecipe, query: &DiscoveryQuery) -> bool {
        if !query.has_tags() {
            return true;
        }
        let mut tags = Vec::new();
        if let Some(cuisine) = &query.cuisine {
            tags.push(SemanticTag::Cuisine(cuisine.to_lowercase()));
        }
        if let Some(meal) = &query.meal_type {
            tags.push(SemanticTag::MealType(meal.to_lowercase()));
        }
        tags.extend(
            query
                .diets
                .iter()
                .filter_map(|d| DietaryRequirement::parse(d))
                .map(SemanticTag::Diet),
        );
        self.normalizer
            .candidate(recipe.clone(), CandidateOrigin::Discovery, self.name())
            .is_ok_and(|candidate| failed_tags(&candidate, &tags).is_empty())
    }
}

#[async_trait]
impl RecipeDiscovery for FixtureDiscovery {
    fn name(&self) -> &'static str {
        "fixture-discovery"
    }

    async fn search(&self, query: &DiscoveryQuery) -> Result<Vec<RawRecipe>, CollaboratorError> {
        let wanted: Vec<IngredientToken> = query
            .ingredients
            .iter()
            .map(|i| self.normalizer.normalize(i))
            .collect();

        let mut ranked: Vec<(usize, &RawRecipe)> = self
            .recipes
            .iter()
            .filter(|r| self.matches_tags(r, query))
            .map(|r| (self.overlap(r, &wanted), r))
            .filter(|(overlap, _)| *overlap > 0)
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.key().cmp(&b.1.key())));

        let results: Vec<RawRecipe> = ranked
            .into_iter()
            .take(query.limit)
            .map(|(_, recipe)| {
                let mut recipe = recipe.clone();
                if self.summaries_only {
                    recipe.extended_ingredients.clear();
                    recipe.analyzed_instructions.clear();
                }
                recipe
            })
            .collect();
        debug!(
            results = results.len(),
            tagged = query.has_tags(),
            "Fixture discovery search"
        );
        Ok(results)
    }

    async fn enrich(&self, ids: &[String]) -> Result<Vec<RawRecipe>, CollaboratorError> {
        Ok(ids
            .iter()
            .filter_map(|id| {
                self.recipes
                    .iter()
                    .find(|r| r.key().as_deref() == Some(id.as_str()))
                    .cloned()
            })
            .collect())
    }
}
