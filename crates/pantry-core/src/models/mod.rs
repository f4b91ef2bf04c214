// ABOUTME: Request-scoped domain models for the recipe decision engine
// ABOUTME: Candidates, raw collaborator records, safety verdicts, tiers, constraints, and quota
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain models.
//!
//! Every value here lives for a single recommendation request. Nothing is
//! persisted and nothing is shared between requests.

mod candidate;
mod constraints;
mod ingredient;
mod quota;
mod recipe;
mod safety;
mod tier;

pub use candidate::{Candidate, CandidateOrigin, Difficulty, SemanticTags, SourceFlags};
pub use constraints::{
    ConstraintsRequest, DietaryRequirement, Intolerance, Mood, Profile, RelaxedConstraint,
    SemanticTag, UserConstraints,
};
pub use ingredient::IngredientToken;
pub use quota::QuotaBudget;
pub use recipe::{
    InstructionBlock, InstructionStep, NutritionSummary, RawIngredient, RawRecipe, RecipeId,
};
pub use safety::{SafetyOutcome, SafetyTrigger, SafetyVerdict};
pub use tier::{ConfidenceTier, TierStatus};
