// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for scoring, tiers, orchestration, retries, and service names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Engine constants grouped into logical domains rather than a single flat list.
//! Configuration structs use these as their defaults.

/// Profile weight tables for the base fit score (used-weight, missing-weight)
pub mod profiles {
    /// Balanced profile weights
    pub const BALANCED: (f64, f64) = (0.5, 0.5);
    /// Minimal shopper favors recipes with few missing items
    pub const MINIMAL_SHOPPER: (f64, f64) = (0.3, 0.7);
    /// Pantry cleaner favors recipes that use up what is on hand
    pub const PANTRY_CLEANER: (f64, f64) = (0.7, 0.3);
}

/// Mood weight vectors and time thresholds
pub mod moods {
    /// Neutral weight; a mood weight equal to this leaves a penalty rate unchanged
    pub const NEUTRAL_WEIGHT: f64 = 0.5;

    /// Tired mood weights (time, effort, skill, shopping)
    pub const TIRED: [f64; 4] = [0.5, 0.7, 0.3, 0.8];
    /// Casual mood weights (time, effort, skill, shopping)
    pub const CASUAL: [f64; 4] = [0.5, 0.5, 0.5, 0.5];
    /// Energetic mood weights (time, effort, skill, shopping)
    pub const ENERGETIC: [f64; 4] = [0.3, 0.4, 0.7, 0.4];

    /// Default ready-time ceiling in minutes for a tired cook
    pub const TIRED_TIME_THRESHOLD_MIN: u32 = 30;
    /// Default ready-time ceiling in minutes for a casual cook
    pub const CASUAL_TIME_THRESHOLD_MIN: u32 = 60;
    /// Default ready-time ceiling in minutes for an energetic cook
    pub const ENERGETIC_TIME_THRESHOLD_MIN: u32 = 120;
}

/// Soft-penalty and bonus constants for the fit score
pub mod scoring {
    /// Points deducted per minute over the time threshold
    pub const TIME_PENALTY_PER_MINUTE: f64 = 2.0;
    /// Maximum total time penalty
    pub const TIME_PENALTY_CAP: f64 = 30.0;
    /// Points deducted per missing ingredient above the allowed maximum
    pub const MISSING_PENALTY_PER_ITEM: f64 = 5.0;
    /// Points deducted when the recipe is harder than requested
    pub const DIFFICULTY_PENALTY: f64 = 15.0;
    /// Points deducted per skill point the recipe demands beyond the cook's level
    pub const SKILL_GAP_PENALTY_PER_POINT: f64 = 0.2;
    /// Default allowed number of missing ingredients
    pub const DEFAULT_MAX_MISSING: u32 = 3;

    /// Bonus for a quick recipe when tired
    pub const QUICK_RECIPE_BONUS: f64 = 15.0;
    /// Ready time at or under which a recipe counts as quick
    pub const QUICK_RECIPE_MAX_MIN: u32 = 20;
    /// Bonus for a complex recipe when energetic
    pub const COMPLEX_RECIPE_BONUS: f64 = 10.0;
    /// Step count at or above which a recipe counts as complex
    pub const COMPLEX_RECIPE_MIN_STEPS: u32 = 10;
    /// Bonus for an easy, quick recipe with at most one missing item
    pub const PERFECT_MATCH_BONUS: f64 = 5.0;

    /// Minimum score a surviving candidate can receive
    pub const SCORE_FLOOR: f64 = 10.0;
    /// Maximum score
    pub const SCORE_CEILING: f64 = 100.0;
}

/// Difficulty derivation thresholds
pub mod difficulty {
    /// Ingredient count at or under which a recipe is easy
    pub const EASY_MAX_INGREDIENTS: usize = 5;
    /// Ingredient count at or under which a recipe is medium
    pub const MEDIUM_MAX_INGREDIENTS: usize = 10;
    /// Ready time above which difficulty is bumped one level
    pub const LONG_RECIPE_MIN: u32 = 60;
    /// Skill required for an easy recipe (0-100)
    pub const EASY_SKILL: u8 = 30;
    /// Skill required for a medium recipe (0-100)
    pub const MEDIUM_SKILL: u8 = 60;
    /// Skill required for a hard recipe (0-100)
    pub const HARD_SKILL: u8 = 90;
}

/// Confidence tier values
pub mod tiers {
    /// Passed every declared constraint on the strict pass
    pub const GOLDEN: f64 = 1.0;
    /// Rescue candidate confirmed by the arbiter
    pub const UPGRADED: f64 = 0.9;
    /// Passed safety but failed a semantic tag
    pub const RESCUE: f64 = 0.6;
}

/// Orchestration thresholds and request budgets
pub mod orchestration {
    /// Validated candidate count below which the pipeline widens its search
    pub const MIN_VALIDATED: usize = 5;
    /// Arbiter confidence that must be exceeded to accept a PASS verdict
    pub const ARBITER_ACCEPTANCE: f64 = 0.75;
    /// Wall-clock budget for one request in milliseconds
    pub const REQUEST_BUDGET_MS: u64 = 20_000;
    /// Collaborator calls allowed per request
    pub const QUOTA_PER_REQUEST: u32 = 40;
    /// Maximum records requested from discovery per search
    pub const DISCOVERY_LIMIT: usize = 20;
    /// Minimum recipes requested from the generation call
    pub const GENERATION_COUNT: usize = 3;
    /// Concurrent arbiter reviews in flight
    pub const REVIEW_CONCURRENCY: usize = 4;
    /// Missing ingredients per recipe sent for substitution advice
    pub const SUBSTITUTION_LIMIT: usize = 3;
    /// Default number of results returned to the caller
    pub const DEFAULT_TARGET_COUNT: usize = 10;
    /// Maximum number of results a caller may request
    pub const MAX_TARGET_COUNT: usize = 50;
}

/// Collaborator retry policy defaults
pub mod retry {
    /// Attempts per collaborator call, including the first
    pub const MAX_ATTEMPTS: u32 = 3;
    /// Backoff before the first retry in milliseconds
    pub const INITIAL_BACKOFF_MS: u64 = 200;
    /// Backoff ceiling in milliseconds
    pub const MAX_BACKOFF_MS: u64 = 2_000;
    /// Timeout for a single attempt in milliseconds
    pub const CALL_TIMEOUT_MS: u64 = 5_000;
}

/// Safety filter defaults
pub mod safety {
    /// Words inspected on each side of a restricted keyword for a qualifier
    pub const SAFE_WORD_WINDOW: usize = 2;
}

/// Service identity used in structured logs
pub mod service_names {
    /// Engine service name
    pub const PANTRY_CHEF: &str = "pantry-chef";
    /// Discovery collaborator label
    pub const DISCOVERY: &str = "discovery";
    /// Arbiter collaborator label
    pub const ARBITER: &str = "arbiter";
}
