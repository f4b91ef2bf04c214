// ABOUTME: Arbiter prompts for LLM interactions loaded at compile time
// ABOUTME: Safety validation, categorization, generation, and substitution prompts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Arbiter Prompts
//!
//! Prompts are loaded at compile time from markdown files for easy maintenance.
//! Each prompt pins the JSON shape the arbiter adapter validates.

/// Safety and semantic validation prompt
pub const SAFETY_VALIDATION_PROMPT: &str = include_str!("safety_validation.md");

/// Core/secondary ingredient categorization prompt
pub const INGREDIENT_CATEGORIZATION_PROMPT: &str = include_str!("ingredient_categorization.md");

/// Last-resort recipe generation prompt
pub const RECIPE_GENERATION_PROMPT: &str = include_str!("recipe_generation.md");

/// Missing-ingredient substitution prompt
pub const INGREDIENT_SUBSTITUTION_PROMPT: &str = include_str!("ingredient_substitution.md");

/// System prompt for validating a candidate against one failed constraint
#[must_use]
pub const fn get_safety_validation_prompt() -> &'static str {
    SAFETY_VALIDATION_PROMPT
}

/// System prompt for splitting ingredients into core and secondary sets
#[must_use]
pub const fn get_ingredient_categorization_prompt() -> &'static str {
    INGREDIENT_CATEGORIZATION_PROMPT
}

/// System prompt for generating recipes from an ingredient list
#[must_use]
pub const fn get_recipe_generation_prompt() -> &'static str {
    RECIPE_GENERATION_PROMPT
}

/// System prompt for suggesting a stand-in for one missing ingredient
#[must_use]
pub const fn get_ingredient_substitution_prompt() -> &'static str {
    INGREDIENT_SUBSTITUTION_PROMPT
}
