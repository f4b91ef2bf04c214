// ABOUTME: Continuous fit score from ingredient overlap, time, effort, and skill signals
// ABOUTME: Profile weights set the base score; mood modulates soft penalties and bonuses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Scoring Engine
//!
//! ```text
//! base = used_weight * used% + missing_weight * (100 - missed%)
//! raw  = base - penalties + bonuses
//! fit  = clamp(raw, floor, ceiling)
//! ```
//!
//! Penalties never exclude a candidate; the floor keeps every recipe
//! rankable. The score only orders candidates inside one confidence tier.

use pantry_core::models::{Candidate, Difficulty, Mood, Profile, UserConstraints};
use serde::{Deserialize, Serialize};

use crate::config::{MoodVector, ScoringConfig};
use crate::normalizer::IngredientNormalizer;

/// One penalty or bonus applied on top of the base score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreAdjustment {
    /// What triggered the adjustment
    pub label: String,
    /// Signed points (negative for penalties)
    pub points: f64,
}

/// How a fit score was reached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Candidate ingredients the user has
    pub used_count: usize,
    /// Candidate ingredients the user lacks
    pub missed_count: usize,
    /// Normalized names of the lacking ingredients, in recipe order
    #[serde(default)]
    pub missing: Vec<String>,
    /// Candidate ingredients ignored as pantry staples
    pub staple_count: usize,
    /// Used ingredients as a percentage of the ingredient list
    pub used_percent: f64,
    /// Missed ingredients as a percentage of the ingredient list
    pub missed_percent: f64,
    /// Profile-weighted base score
    pub base: f64,
    /// Penalties and bonuses in application order
    pub adjustments: Vec<ScoreAdjustment>,
    /// Score before clamping
    pub raw: f64,
    /// True when the floor lifted the score
    pub floored: bool,
}

impl ScoreBreakdown {
    /// Human-readable one-line summary
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!(
            "base {:.1} ({} used, {} missing, {} staples)",
            self.base, self.used_count, self.missed_count, self.staple_count
        )];
        parts.extend(
            self.adjustments
                .iter()
                .map(|a| format!("{} {:+.1}", a.label, a.points)),
        );
        if self.floored {
            parts.push("floored".to_owned());
        }
        parts.join(", ")
    }
}

/// Continuous fit score in `[floor, ceiling]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitScore {
    /// Final score
    pub value: f64,
    /// How the score was reached
    pub breakdown: ScoreBreakdown,
}

/// Computes fit scores
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: ScoringConfig,
    normalizer: IngredientNormalizer,
}

impl ScoringEngine {
    /// Create a scoring engine
    #[must_use]
    pub const fn new(config: ScoringConfig, normalizer: IngredientNormalizer) -> Self {
        Self { config, normalizer }
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score one candidate for a profile and mood
    #[must_use]
    pub fn score(
        &self,
        candidate: &Candidate,
        constraints: &UserConstraints,
        profile: Profile,
        mood: Mood,
    ) -> FitScore {
        let (used_count, missing, staple_count) = self.overlap(candidate, constraints);
        let missed_count = missing.len();
        let total = candidate.ingredients.len();
        let (used_percent, missed_percent) = if total == 0 {
            (0.0, 0.0)
        } else {
            (
                used_count as f64 / total as f64 * 100.0,
                missed_count as f64 / total as f64 * 100.0,
            )
        };

        let base = if total == 0 {
            0.0
        } else {
            let weights = self.config.profiles.for_profile(profile);
            weights.used.mul_add(used_percent, weights.missing * (100.0 - missed_percent))
        };

        let vector = self.config.moods.for_mood(mood);
        let mut adjustments = self.penalties(candidate, constraints, &vector, missed_count);
        adjustments.extend(self.bonuses(candidate, mood, missed_count));

        let raw = base + adjustments.iter().map(|a| a.points).sum::<f64>();
        let bonuses = &self.config.bonuses;
        let value = raw.clamp(bonuses.floor, bonuses.ceiling);

        FitScore {
            value,
            breakdown: ScoreBreakdown {
                used_count,
                missed_count,
                missing,
                staple_count,
                used_percent,
                missed_percent,
                base,
                adjustments,
                raw,
                floored: raw < bonuses.floor,
            },
        }
    }

    /// (used, missing names, staples) over the candidate's ingredient list
    fn overlap(
        &self,
        candidate: &Candidate,
        constraints: &UserConstraints,
    ) -> (usize, Vec<String>, usize) {
        let mut used = 0;
        let mut missing = Vec::new();
        let mut staples = 0;
        for ingredient in &candidate.ingredients {
            if self.normalizer.is_staple(ingredient) {
                staples += 1;
            } else if constraints
                .ingredients()
                .iter()
                .any(|have| self.normalizer.matches(have, ingredient))
            {
                used += 1;
            } else {
                missing.push(ingredient.normalized().to_owned());
            }
        }
        (used, missing, staples)
    }

    fn penalties(
        &self,
        candidate: &Candidate,
        constraints: &UserConstraints,
        vector: &MoodVector,
        missed_count: usize,
    ) -> Vec<ScoreAdjustment> {
        let rates = &self.config.penalties;
        let scale = |weight: f64| weight / rates.neutral_weight;
        let mut adjustments = Vec::new();

        // A stated ready-time ceiling replaces the mood default
        let threshold = constraints
            .max_ready_minutes()
            .unwrap_or(vector.time_threshold_min);
        if let Some(ready) = candidate.ready_in_minutes {
            if ready > threshold {
                let over = ready - threshold;
                let points = (f64::from(over) * rates.time_per_minute).min(rates.time_cap)
                    * scale(vector.time);
                adjustments.push(ScoreAdjustment {
                    label: format!("{over} min over {threshold} min"),
                    points: -points,
                });
            }
        }

        let allowed = constraints
            .max_missing()
            .unwrap_or(rates.default_max_missing) as usize;
        if missed_count > allowed {
            let excess = missed_count - allowed;
            adjustments.push(ScoreAdjustment {
                label: format!("{excess} missing over allowance of {allowed}"),
                points: -(excess as f64 * rates.missing_per_item * scale(vector.shopping)),
            });
        }

        if let Some(max) = constraints.max_difficulty() {
            if candidate.difficulty > max {
                adjustments.push(ScoreAdjustment {
                    label: format!(
                        "{} harder than {}",
                        candidate.difficulty.as_str(),
                        max.as_str()
                    ),
                    points: -(rates.difficulty * scale(vector.effort)),
                });
            }
        }

        if let Some(skill) = constraints.skill_level() {
            let required = candidate.difficulty.required_skill();
            if required > skill {
                let gap = required - skill;
                adjustments.push(ScoreAdjustment {
                    label: format!("skill gap {gap}"),
                    points: -(f64::from(gap) * rates.skill_gap_per_point * scale(vector.skill)),
                });
            }
        }

        adjustments
    }

    fn bonuses(&self, candidate: &Candidate, mood: Mood, missed_count: usize) -> Vec<ScoreAdjustment> {
        let bonuses = &self.config.bonuses;
        let quick = candidate
            .ready_in_minutes
            .is_some_and(|m| m <= bonuses.quick_recipe_max_min);
        let complex = candidate.difficulty == Difficulty::Hard
            || candidate.step_count >= bonuses.complex_recipe_min_steps;
        let mut adjustments = Vec::new();

        if mood == Mood::Tired && quick {
            adjustments.push(ScoreAdjustment {
                label: "quick recipe for a tired cook".to_owned(),
                points: bonuses.quick_recipe,
            });
        }
        if mood == Mood::Energetic && complex {
            adjustments.push(ScoreAdjustment {
                label: "complex recipe for an energetic cook".to_owned(),
                points: bonuses.complex_recipe,
            });
        }
        if missed_count <= 1 && candidate.difficulty == Difficulty::Easy && quick {
            adjustments.push(ScoreAdjustment {
                label: "perfect match".to_owned(),
                points: bonuses.perfect_match,
            });
        }
        adjustments
    }
}
