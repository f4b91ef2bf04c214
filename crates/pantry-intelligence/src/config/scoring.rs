// ABOUTME: Fit score configuration: profile weights, mood vectors, penalty rates, and bonuses
// ABOUTME: Defaults mirror the engine constants and are validated before use
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Scoring Configuration
//!
//! Weight tables for the base overlap score, per-mood modulation vectors,
//! soft penalty rates, and boundary bonuses.

use pantry_core::constants::{moods, profiles, scoring};
use pantry_core::models::{Mood, Profile};
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Complete scoring configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Base score weights per profile
    pub profiles: ProfileWeights,
    /// Penalty modulation per mood
    pub moods: MoodWeights,
    /// Soft penalty rates
    pub penalties: PenaltyRates,
    /// Boundary bonuses
    pub bonuses: Bonuses,
}

/// Used-weight and missing-weight pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightPair {
    /// Weight on the share of recipe ingredients the user has
    pub used: f64,
    /// Weight on the share of recipe ingredients the user does not need to buy
    pub missing: f64,
}

impl WeightPair {
    const fn from_tuple((used, missing): (f64, f64)) -> Self {
        Self { used, missing }
    }
}

/// Weight table indexed by profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileWeights {
    /// Balanced profile
    pub balanced: WeightPair,
    /// Minimal shopper profile
    pub minimal_shopper: WeightPair,
    /// Pantry cleaner profile
    pub pantry_cleaner: WeightPair,
}

impl Default for ProfileWeights {
    fn default() -> Self {
        Self {
            balanced: WeightPair::from_tuple(profiles::BALANCED),
            minimal_shopper: WeightPair::from_tuple(profiles::MINIMAL_SHOPPER),
            pantry_cleaner: WeightPair::from_tuple(profiles::PANTRY_CLEANER),
        }
    }
}

impl ProfileWeights {
    /// Weights for a profile
    #[must_use]
    pub const fn for_profile(&self, profile: Profile) -> WeightPair {
        match profile {
            Profile::Balanced => self.balanced,
            Profile::MinimalShopper => self.minimal_shopper,
            Profile::PantryCleaner => self.pantry_cleaner,
        }
    }
}

/// Penalty modulation weights and default time threshold for one mood
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodVector {
    /// Time sensitivity
    pub time: f64,
    /// Effort sensitivity
    pub effort: f64,
    /// Skill sensitivity
    pub skill: f64,
    /// Shopping sensitivity
    pub shopping: f64,
    /// Default ready-time ceiling in minutes
    pub time_threshold_min: u32,
}

impl MoodVector {
    const fn from_weights(weights: [f64; 4], time_threshold_min: u32) -> Self {
        Self {
            time: weights[0],
            effort: weights[1],
            skill: weights[2],
            shopping: weights[3],
            time_threshold_min,
        }
    }

    fn weights(&self) -> [f64; 4] {
        [self.time, self.effort, self.skill, self.shopping]
    }
}

/// Mood vectors indexed by mood
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodWeights {
    /// Tired mood
    pub tired: MoodVector,
    /// Casual mood
    pub casual: MoodVector,
    /// Energetic mood
    pub energetic: MoodVector,
}

impl Default for MoodWeights {
    fn default() -> Self {
        Self {
            tired: MoodVector::from_weights(moods::TIRED, moods::TIRED_TIME_THRESHOLD_MIN),
            casual: MoodVector::from_weights(moods::CASUAL, moods::CASUAL_TIME_THRESHOLD_MIN),
            energetic: MoodVector::from_weights(
                moods::ENERGETIC,
                moods::ENERGETIC_TIME_THRESHOLD_MIN,
            ),
        }
    }
}

impl MoodWeights {
    /// Vector for a mood
    #[must_use]
    pub const fn for_mood(&self, mood: Mood) -> MoodVector {
        match mood {
            Mood::Tired => self.tired,
            Mood::Casual => self.casual,
            Mood::Energetic => self.energetic,
        }
    }
}

/// Soft penalty rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyRates {
    /// Points per minute over the time threshold
    pub time_per_minute: f64,
    /// Cap on the total time penalty
    pub time_cap: f64,
    /// Points per missing ingredient above the allowance
    pub missing_per_item: f64,
    /// Allowance used when the request sets none
    pub default_max_missing: u32,
    /// Points when the recipe is harder than requested
    pub difficulty: f64,
    /// Points per skill point beyond the cook's level
    pub skill_gap_per_point: f64,
    /// Neutral mood weight; rates scale by `mood_weight / neutral_weight`
    pub neutral_weight: f64,
}

impl Default for PenaltyRates {
    fn default() -> Self {
        Self {
            time_per_minute: scoring::TIME_PENALTY_PER_MINUTE,
            time_cap: scoring::TIME_PENALTY_CAP,
            missing_per_item: scoring::MISSING_PENALTY_PER_ITEM,
            default_max_missing: scoring::DEFAULT_MAX_MISSING,
            difficulty: scoring::DIFFICULTY_PENALTY,
            skill_gap_per_point: scoring::SKILL_GAP_PENALTY_PER_POINT,
            neutral_weight: moods::NEUTRAL_WEIGHT,
        }
    }
}

/// Boundary bonuses and the score clamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bonuses {
    /// Bonus for a quick recipe when tired
    pub quick_recipe: f64,
    /// Ready time at or under which a recipe counts as quick
    pub quick_recipe_max_min: u32,
    /// Bonus for a complex recipe when energetic
    pub complex_recipe: f64,
    /// Step count at or above which a recipe counts as complex
    pub complex_recipe_min_steps: u32,
    /// Bonus for an easy, quick recipe with at most one missing item
    pub perfect_match: f64,
    /// Minimum score
    pub floor: f64,
    /// Maximum score
    pub ceiling: f64,
}

impl Default for Bonuses {
    fn default() -> Self {
        Self {
            quick_recipe: scoring::QUICK_RECIPE_BONUS,
            quick_recipe_max_min: scoring::QUICK_RECIPE_MAX_MIN,
            complex_recipe: scoring::COMPLEX_RECIPE_BONUS,
            complex_recipe_min_steps: scoring::COMPLEX_RECIPE_MIN_STEPS,
            perfect_match: scoring::PERFECT_MATCH_BONUS,
            floor: scoring::SCORE_FLOOR,
            ceiling: scoring::SCORE_CEILING,
        }
    }
}

impl ScoringConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a profile pair does not sum to 1, a mood weight is
    /// outside 0-1, a rate is negative, or the floor is not below the ceiling
    pub fn validate(&self) -> Result<(), ConfigError> {
        for pair in [
            self.profiles.balanced,
            self.profiles.minimal_shopper,
            self.profiles.pantry_cleaner,
        ] {
            if !(0.0..=1.0).contains(&pair.used) || !(0.0..=1.0).contains(&pair.missing) {
                return Err(ConfigError::InvalidRange(
                    "profile weights must be between 0 and 1",
                ));
            }
            if (pair.used + pair.missing - 1.0).abs() > 1e-6 {
                return Err(ConfigError::InvalidWeights(
                    "profile used and missing weights must sum to 1",
                ));
            }
        }

        for vector in [self.moods.tired, self.moods.casual, self.moods.energetic] {
            if vector.weights().iter().any(|w| !(0.0..=1.0).contains(w)) {
                return Err(ConfigError::InvalidRange(
                    "mood weights must be between 0 and 1",
                ));
            }
            if vector.time_threshold_min == 0 {
                return Err(ConfigError::ValueOutOfRange(
                    "mood time threshold must be positive",
                ));
            }
        }

        let rates = &self.penalties;
        if [
            rates.time_per_minute,
            rates.time_cap,
            rates.missing_per_item,
            rates.difficulty,
            rates.skill_gap_per_point,
        ]
        .iter()
        .any(|r| *r < 0.0)
        {
            return Err(ConfigError::ValueOutOfRange(
                "penalty rates must not be negative",
            ));
        }
        if rates.neutral_weight <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "neutral mood weight must be positive",
            ));
        }

        let bonuses = &self.bonuses;
        if bonuses.floor < 0.0 || bonuses.floor >= bonuses.ceiling {
            return Err(ConfigError::ValueOutOfRange(
                "score floor must be non-negative and below the ceiling",
            ));
        }
        Ok(())
    }
}
