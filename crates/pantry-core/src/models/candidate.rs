// ABOUTME: Candidate recipe under evaluation, built once per pipeline pass from a raw record
// ABOUTME: Immutable; verdicts, scores, and tiers live in stage-owned records outside the candidate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::ingredient::IngredientToken;
use super::recipe::{NutritionSummary, RawIngredient, RawRecipe};
use crate::constants::difficulty;
use crate::errors::EngineError;

/// Where a candidate entered the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateOrigin {
    /// Discovery search with the user's ingredients
    Discovery,
    /// Discovery search with a reduced core ingredient set
    ReducedSearch,
    /// Produced by the arbiter's generation call
    Generated,
}

impl CandidateOrigin {
    /// String representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Discovery => "discovery",
            Self::ReducedSearch => "reduced_search",
            Self::Generated => "generated",
        }
    }
}

/// Derived recipe difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Few ingredients
    Easy,
    /// Moderate ingredient count
    Medium,
    /// Many ingredients or a long cook
    Hard,
}

impl Difficulty {
    /// Derive difficulty from ingredient count, bumped one level for long recipes
    #[must_use]
    pub const fn derive(ingredient_count: usize, ready_in_minutes: Option<u32>) -> Self {
        let base = if ingredient_count <= difficulty::EASY_MAX_INGREDIENTS {
            Self::Easy
        } else if ingredient_count <= difficulty::MEDIUM_MAX_INGREDIENTS {
            Self::Medium
        } else {
            Self::Hard
        };
        match ready_in_minutes {
            Some(minutes) if minutes > difficulty::LONG_RECIPE_MIN => base.harder(),
            _ => base,
        }
    }

    /// One level harder, saturating at `Hard`
    #[must_use]
    pub const fn harder(self) -> Self {
        match self {
            Self::Easy => Self::Medium,
            Self::Medium | Self::Hard => Self::Hard,
        }
    }

    /// Skill (0-100) a cook needs for this difficulty
    #[must_use]
    pub const fn required_skill(&self) -> u8 {
        match self {
            Self::Easy => difficulty::EASY_SKILL,
            Self::Medium => difficulty::MEDIUM_SKILL,
            Self::Hard => difficulty::HARD_SKILL,
        }
    }

    /// Parse from a user-facing name
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    /// String representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

/// Advisory dietary flags declared by the source; `None` means the source did not say
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFlags {
    /// Source claims the recipe is vegetarian
    pub vegetarian: Option<bool>,
    /// Source claims the recipe is vegan
    pub vegan: Option<bool>,
    /// Source claims the recipe is gluten-free
    pub gluten_free: Option<bool>,
    /// Source claims the recipe is dairy-free
    pub dairy_free: Option<bool>,
}

/// Lowercased semantic labels declared by the source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticTags {
    /// Cuisine labels
    pub cuisines: Vec<String>,
    /// Meal or dish type labels
    pub meal_types: Vec<String>,
    /// Diet labels
    pub diets: Vec<String>,
}

impl SemanticTags {
    fn from_labels(cuisines: &[String], meal_types: &[String], diets: &[String]) -> Self {
        let clean = |labels: &[String]| {
            labels
                .iter()
                .map(|l| l.trim().to_lowercase())
                .filter(|l| !l.is_empty())
                .collect()
        };
        Self {
            cuisines: clean(cuisines),
            meal_types: clean(meal_types),
            diets: clean(diets),
        }
    }
}

/// A recipe under evaluation.
///
/// Candidates are shared read-only between stages. The safety verdict, fit
/// score, and confidence tier are owned by the stage that computes them and
/// are never stored on the candidate itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Stable identifier
    pub id: String,
    /// Display title (never used for safety decisions)
    pub title: String,
    /// Normalized ingredient list
    pub ingredients: Vec<IngredientToken>,
    /// Preparation time in minutes
    pub ready_in_minutes: Option<u32>,
    /// Number of instruction steps
    pub step_count: u32,
    /// Derived difficulty
    pub difficulty: Difficulty,
    /// Nutrition summary
    pub nutrition: NutritionSummary,
    /// Advisory source flags
    pub source_flags: SourceFlags,
    /// Semantic labels
    pub tags: SemanticTags,
    /// Pipeline entry point
    pub origin: CandidateOrigin,
    /// Source link
    pub source_url: Option<String>,
}

impl Candidate {
    /// Build a candidate from a validated raw record
    ///
    /// `tokenize` converts one ingredient line into its normalized token; lines
    /// it rejects (blank after normalization) are skipped.
    ///
    /// # Errors
    ///
    /// Returns `MalformedCollaboratorResponse` when the record fails validation
    pub fn from_raw<F>(
        raw: RawRecipe,
        origin: CandidateOrigin,
        collaborator: &str,
        tokenize: F,
    ) -> Result<Self, EngineError>
    where
        F: Fn(&RawIngredient) -> Option<IngredientToken>,
    {
        raw.validate(collaborator)?;
        let id = raw.key().unwrap_or_default();
        let ingredients: Vec<IngredientToken> =
            raw.extended_ingredients.iter().filter_map(&tokenize).collect();
        let step_count = raw.total_steps();
        let source_flags = raw.source_flags();
        let tags = SemanticTags::from_labels(&raw.cuisines, &raw.dish_types, &raw.diets);

        Ok(Self {
            id,
            title: raw.title.unwrap_or_default().trim().to_owned(),
            difficulty: Difficulty::derive(ingredients.len(), raw.ready_in_minutes),
            ingredients,
            ready_in_minutes: raw.ready_in_minutes,
            step_count,
            nutrition: raw.nutrition.unwrap_or_default(),
            source_flags,
            tags,
            origin,
            source_url: raw.source_url,
        })
    }

    /// Original ingredient text, for collaborator prompts
    #[must_use]
    pub fn ingredient_names(&self) -> Vec<String> {
        self.ingredients
            .iter()
            .map(|t| t.original().to_owned())
            .collect()
    }
}
