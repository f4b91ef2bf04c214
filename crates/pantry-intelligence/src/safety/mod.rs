// ABOUTME: Dietary safety filter classifying candidates as PASS, REJECT, or NEEDS_REVIEW
// ABOUTME: Hard keyword layer, safe-word layer, and source-flag cross-check over ingredients only
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Dietary Safety Filter
//!
//! Three layers, applied per rule (dietary requirement or intolerance):
//!
//! 1. **Hard keywords**: the ingredient list (never the title) is scanned for
//!    restricted terms. Any unguarded hit rejects the candidate outright.
//! 2. **Safe words**: a recognized qualifier next to a hit ("almond milk",
//!    "gluten-free pasta") downgrades the hit to `NEEDS_REVIEW`.
//! 3. **Source cross-check**: the source's advisory flags are compared with
//!    the keyword result. Agreement confirms, disagreement forces review.
//!
//! Intolerances are checked against their own tables.

/// Restriction-family keyword tables
pub mod keywords;

pub use keywords::{FamilyTable, KeywordHit, KeywordTables, RestrictionFamily};

use pantry_core::models::{
    Candidate, DietaryRequirement, Intolerance, SafetyOutcome, SafetyTrigger, SourceFlags,
    UserConstraints,
};
use tracing::debug;

use crate::config::SafetyConfig;
use crate::normalizer::IngredientNormalizer;

/// One hard rule a candidate is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyRule {
    /// A dietary requirement
    Diet(DietaryRequirement),
    /// An intolerance
    Intolerance(Intolerance),
}

impl SafetyRule {
    /// Human-readable rule name used in reasons and triggers
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Diet(diet) => diet.as_str().to_owned(),
            Self::Intolerance(intolerance) => format!("{} intolerance", intolerance.as_str()),
        }
    }

    /// Families whose keywords violate this rule
    #[must_use]
    pub const fn families(&self) -> &'static [RestrictionFamily] {
        use RestrictionFamily as F;
        match self {
            Self::Diet(DietaryRequirement::Vegetarian) => &[F::LandMeat, F::Seafood],
            Self::Diet(DietaryRequirement::Vegan) => {
                &[F::LandMeat, F::Seafood, F::Dairy, F::Egg, F::AnimalDerived]
            }
            Self::Diet(DietaryRequirement::Pescatarian) => &[F::LandMeat],
            Self::Diet(DietaryRequirement::GlutenFree) => &[F::Gluten],
            Self::Diet(DietaryRequirement::DairyFree) => &[F::Dairy],
            Self::Intolerance(Intolerance::Dairy) => &[F::Dairy],
            Self::Intolerance(Intolerance::Gluten) => &[F::Gluten],
            Self::Intolerance(Intolerance::Egg) => &[F::Egg],
            Self::Intolerance(Intolerance::Nut) => &[F::Nut],
            Self::Intolerance(Intolerance::Shellfish) => &[F::Shellfish],
        }
    }

    /// What the source's advisory flags claim about this rule.
    ///
    /// `Some(true)` means the source says the recipe is safe for the rule,
    /// `Some(false)` that it is not, `None` that the source says nothing.
    #[must_use]
    pub fn source_claim(&self, flags: SourceFlags) -> Option<bool> {
        let vegan = flags.vegan.filter(|v| *v);
        let plant_based = flags.vegetarian.filter(|v| *v).or(vegan);
        match self {
            Self::Diet(DietaryRequirement::Vegetarian) => flags.vegetarian.or(vegan),
            Self::Diet(DietaryRequirement::Vegan) => flags.vegan,
            Self::Diet(DietaryRequirement::Pescatarian)
            | Self::Intolerance(Intolerance::Shellfish) => plant_based,
            Self::Diet(DietaryRequirement::GlutenFree) | Self::Intolerance(Intolerance::Gluten) => {
                flags.gluten_free
            }
            Self::Diet(DietaryRequirement::DairyFree) | Self::Intolerance(Intolerance::Dairy) => {
                flags.dairy_free.or(vegan)
            }
            Self::Intolerance(Intolerance::Egg) => vegan,
            Self::Intolerance(Intolerance::Nut) => None,
        }
    }

    const fn is_intolerance(&self) -> bool {
        matches!(self, Self::Intolerance(_))
    }
}

/// Every rule declared by a set of constraints
#[must_use]
pub fn rules_for(constraints: &UserConstraints) -> Vec<SafetyRule> {
    constraints
        .diets()
        .iter()
        .copied()
        .map(SafetyRule::Diet)
        .chain(
            constraints
                .intolerances()
                .iter()
                .copied()
                .map(SafetyRule::Intolerance),
        )
        .collect()
}

/// Keyword-layer finding for one rule
struct RuleFinding {
    rule: SafetyRule,
    guarded: Option<(String, KeywordHit)>,
}

/// Classifies candidates against dietary requirements and intolerances
#[derive(Debug, Clone)]
pub struct DietarySafetyFilter {
    tables: KeywordTables,
    config: SafetyConfig,
}

impl DietarySafetyFilter {
    /// Build the filter, normalizing every keyword table through `normalizer`
    #[must_use]
    pub fn new(normalizer: &IngredientNormalizer, config: SafetyConfig) -> Self {
        Self {
            tables: KeywordTables::build(normalizer),
            config,
        }
    }

    /// Classify one candidate.
    ///
    /// Only the ingredient list is inspected. An empty ingredient list is
    /// never silently passed, even when no rule applies.
    #[must_use]
    pub fn evaluate(&self, candidate: &Candidate, constraints: &UserConstraints) -> SafetyOutcome {
        if candidate.ingredients.is_empty() {
            return SafetyOutcome::needs_review("ingredient list is empty", None);
        }
        let rules = rules_for(constraints);
        if rules.is_empty() {
            return SafetyOutcome::pass();
        }

        let mut findings = Vec::with_capacity(rules.len());
        for rule in rules {
            match self.scan_rule(candidate, rule) {
                Err(rejection) => {
                    debug!(
                        candidate_id = %candidate.id,
                        rule = %rule.label(),
                        "Hard keyword rejection"
                    );
                    return rejection;
                }
                Ok(finding) => findings.push(finding),
            }
        }

        findings
            .into_iter()
            .map(|finding| cross_check(finding, candidate.source_flags))
            .fold(SafetyOutcome::pass(), |acc, outcome| {
                if acc.verdict.worst(outcome.verdict) == acc.verdict {
                    acc
                } else {
                    outcome
                }
            })
    }

    /// Keyword and safe-word layers for one rule. `Err` carries an immediate rejection.
    fn scan_rule(&self, candidate: &Candidate, rule: SafetyRule) -> Result<RuleFinding, SafetyOutcome> {
        let mut guarded = None;
        for family in rule.families() {
            let table = if rule.is_intolerance() {
                self.tables.intolerance(*family)
            } else {
                self.tables.diet(*family)
            };
            let Some(table) = table else {
                continue;
            };
            for token in &candidate.ingredients {
                let Some(hit) = table.scan(token, self.config.safe_word_window) else {
                    continue;
                };
                if !hit.is_guarded() {
                    let trigger = trigger(token.original(), &hit, rule);
                    return Err(SafetyOutcome::reject(
                        format!(
                            "'{}' contains '{}' ({})",
                            token.original(),
                            hit.keyword,
                            rule.label()
                        ),
                        Some(trigger),
                    ));
                }
                if guarded.is_none() {
                    guarded = Some((token.original().to_owned(), hit));
                }
            }
        }
        Ok(RuleFinding { rule, guarded })
    }
}

/// Source cross-check layer
fn cross_check(finding: RuleFinding, flags: SourceFlags) -> SafetyOutcome {
    let label = finding.rule.label();
    let claim = finding.rule.source_claim(flags);
    match (finding.guarded, claim) {
        (None, Some(true) | None) => SafetyOutcome::pass(),
        (None, Some(false)) => SafetyOutcome::needs_review(
            format!("source marks recipe as not {label} but no restricted ingredient was found"),
            None,
        ),
        (Some((ingredient, hit)), Some(false)) => {
            let trigger = trigger(&ingredient, &hit, finding.rule);
            SafetyOutcome::reject(
                format!(
                    "'{ingredient}' contains '{}' and source marks recipe as not {label}",
                    hit.keyword
                ),
                Some(trigger),
            )
        }
        (Some((ingredient, hit)), _) => {
            let trigger = trigger(&ingredient, &hit, finding.rule);
            SafetyOutcome::needs_review(
                format!(
                    "'{ingredient}' contains '{}' qualified by '{}' ({label})",
                    hit.keyword,
                    hit.qualifier.as_deref().unwrap_or_default()
                ),
                Some(trigger),
            )
        }
    }
}

fn trigger(ingredient: &str, hit: &KeywordHit, rule: SafetyRule) -> SafetyTrigger {
    SafetyTrigger {
        ingredient: ingredient.to_owned(),
        keyword: hit.keyword.clone(),
        rule: rule.label(),
        qualifier: hit.qualifier.clone(),
    }
}

