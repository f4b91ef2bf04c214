// ABOUTME: Raw recipe records as returned by discovery, enrichment, and generation collaborators
// ABOUTME: Untrusted input shape with validation before conversion into candidates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

use super::candidate::SourceFlags;
use crate::errors::EngineError;

/// Recipe identifier; the recipe database uses integers, generated recipes use strings
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipeId {
    /// Numeric identifier
    Numeric(i64),
    /// Text identifier
    Text(String),
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Text(id) => write!(f, "{id}"),
        }
    }
}

/// One ingredient line of a raw recipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawIngredient {
    /// Short ingredient name ("almond milk")
    pub name: Option<String>,
    /// Full original line ("1 cup unsweetened almond milk")
    pub original: Option<String>,
}

impl RawIngredient {
    /// Ingredient from a bare name
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            original: Some(name.clone()),
            name: Some(name),
        }
    }

    /// Best available text for matching: the name, falling back to the original line
    #[must_use]
    pub fn match_text(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| self.original.as_deref().filter(|o| !o.trim().is_empty()))
    }
}

/// Nutrition summary per serving
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionSummary {
    /// Energy in kcal
    pub calories: Option<f64>,
    /// Protein in grams
    pub protein: Option<f64>,
    /// Fat in grams
    pub fat: Option<f64>,
    /// Carbohydrates in grams
    pub carbohydrates: Option<f64>,
}

/// A block of instruction steps
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InstructionBlock {
    /// Ordered steps
    pub steps: Vec<InstructionStep>,
}

/// One instruction step
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InstructionStep {
    /// Step number
    pub number: Option<u32>,
    /// Step text
    pub step: String,
}

/// Recipe record in the recipe-database shape.
///
/// Every field is optional on the wire. [`RawRecipe::validate`] enforces the
/// minimum needed to build a candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawRecipe {
    /// Source identifier
    pub id: Option<RecipeId>,
    /// Recipe title
    pub title: Option<String>,
    /// Structured ingredient list
    pub extended_ingredients: Vec<RawIngredient>,
    /// Total preparation time
    pub ready_in_minutes: Option<u32>,
    /// Structured instructions
    pub analyzed_instructions: Vec<InstructionBlock>,
    /// Flat step count when structured instructions are absent
    pub step_count: Option<u32>,
    /// Nutrition summary
    pub nutrition: Option<NutritionSummary>,
    /// Advisory vegetarian flag
    pub vegetarian: Option<bool>,
    /// Advisory vegan flag
    pub vegan: Option<bool>,
    /// Advisory gluten-free flag
    pub gluten_free: Option<bool>,
    /// Advisory dairy-free flag
    pub dairy_free: Option<bool>,
    /// Diet labels ("lacto ovo vegetarian", "gluten free")
    pub diets: Vec<String>,
    /// Cuisine labels
    pub cuisines: Vec<String>,
    /// Dish type labels ("main course", "side dish")
    pub dish_types: Vec<String>,
    /// Source link
    pub source_url: Option<String>,
}

impl RawRecipe {
    /// Start a record with a text identifier and title
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Some(RecipeId::Text(id.into())),
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Replace the ingredient list with bare names
    #[must_use]
    pub fn with_ingredients(mut self, names: &[&str]) -> Self {
        self.extended_ingredients = names.iter().map(|n| RawIngredient::named(*n)).collect();
        self
    }

    /// Set the ready time
    #[must_use]
    pub const fn with_ready_in(mut self, minutes: u32) -> Self {
        self.ready_in_minutes = Some(minutes);
        self
    }

    /// Set a flat step count
    #[must_use]
    pub const fn with_steps(mut self, steps: u32) -> Self {
        self.step_count = Some(steps);
        self
    }

    /// Set cuisine labels
    #[must_use]
    pub fn with_cuisines(mut self, cuisines: &[&str]) -> Self {
        self.cuisines = cuisines.iter().map(|c| (*c).to_owned()).collect();
        self
    }

    /// Set diet labels
    #[must_use]
    pub fn with_diets(mut self, diets: &[&str]) -> Self {
        self.diets = diets.iter().map(|d| (*d).to_owned()).collect();
        self
    }

    /// Set dish type labels
    #[must_use]
    pub fn with_dish_types(mut self, dish_types: &[&str]) -> Self {
        self.dish_types = dish_types.iter().map(|d| (*d).to_owned()).collect();
        self
    }

    /// Set the advisory source flags
    #[must_use]
    pub const fn with_flags(mut self, flags: SourceFlags) -> Self {
        self.vegetarian = flags.vegetarian;
        self.vegan = flags.vegan;
        self.gluten_free = flags.gluten_free;
        self.dairy_free = flags.dairy_free;
        self
    }

    /// Identifier as a string key
    #[must_use]
    pub fn key(&self) -> Option<String> {
        self.id.as_ref().map(ToString::to_string)
    }

    /// True when the record lacks ingredient data and needs enrichment
    #[must_use]
    pub fn is_summary(&self) -> bool {
        self.extended_ingredients.is_empty()
    }

    /// Step count from structured instructions, falling back to the flat count
    #[must_use]
    pub fn total_steps(&self) -> u32 {
        let structured: usize = self
            .analyzed_instructions
            .iter()
            .map(|block| block.steps.len())
            .sum();
        if structured > 0 {
            u32::try_from(structured).unwrap_or(u32::MAX)
        } else {
            self.step_count.unwrap_or(0)
        }
    }

    /// Advisory flags declared by the source
    #[must_use]
    pub const fn source_flags(&self) -> SourceFlags {
        SourceFlags {
            vegetarian: self.vegetarian,
            vegan: self.vegan,
            gluten_free: self.gluten_free,
            dairy_free: self.dairy_free,
        }
    }

    /// Check the minimum shape required to build a candidate
    ///
    /// # Errors
    ///
    /// Returns `MalformedCollaboratorResponse` when the identifier or title is missing
    pub fn validate(&self, collaborator: &str) -> Result<(), EngineError> {
        let malformed = |reason: &str| EngineError::MalformedCollaboratorResponse {
            collaborator: collaborator.to_owned(),
            reason: reason.to_owned(),
        };
        match &self.id {
            None => return Err(malformed("recipe record has no id")),
            Some(RecipeId::Text(id)) if id.trim().is_empty() => {
                return Err(malformed("recipe record has a blank id"))
            }
            Some(_) => {}
        }
        if self.title.as_deref().is_none_or(|t| t.trim().is_empty()) {
            return Err(malformed("recipe record has no title"));
        }
        Ok(())
    }
}
