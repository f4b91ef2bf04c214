// ABOUTME: Ingredient normalizer producing comparable tokens from raw ingredient strings
// ABOUTME: Handles casing, punctuation, leading measures, "x free" qualifiers, and plurals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Ingredient Normalizer
//!
//! Canonicalizes raw ingredient text so that "2 Large Tomatoes," and "tomato"
//! compare equal. Every keyword table in the safety filter is built through
//! the same normalizer, so keyword and ingredient forms always agree.

use pantry_core::errors::EngineError;
use pantry_core::models::{Candidate, CandidateOrigin, IngredientToken, RawIngredient, RawRecipe};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Leading quantity and unit ("2 1/2 cups of", "1 lb", "3 cloves")
static MEASURE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^(?:\d|[½¼¾⅓⅔])[\d½¼¾⅓⅔/.\-\s]*(?:(?:cups?|tbsps?|tablespoons?|tsps?|teaspoons?|oz|ounces?|lbs?|pounds?|grams?|g|kg|ml|liters?|litres?|l|pinch(?:es)?|dash(?:es)?|cans?|cloves?|slices?|pieces?|handfuls?|sprigs?|bunch(?:es)?|stalks?)\b)?\s*(?:of\s+)?",
    )
    .ok()
});

/// Words left untouched by singularization
const INVARIANT_WORDS: &[&str] = &[
    "molasses", "hummus", "couscous", "asparagus", "citrus", "swiss", "grits", "brussels",
    "series", "octopus", "schnapps",
];

/// Irregular plural forms
const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("leaves", "leaf"),
    ("loaves", "loaf"),
    ("halves", "half"),
    ("knives", "knife"),
    ("calves", "calf"),
    ("cookies", "cookie"),
    ("brownies", "brownie"),
    ("smoothies", "smoothie"),
    ("veggies", "veggie"),
    ("pies", "pie"),
    ("quiches", "quiche"),
    ("geese", "goose"),
];

/// Pantry staples that count as neither used nor missing
const PANTRY_STAPLES: &[&str] = &[
    "water",
    "ice",
    "salt",
    "kosher salt",
    "sea salt",
    "pepper",
    "black pepper",
    "salt and pepper",
    "oil",
    "olive oil",
    "vegetable oil",
    "canola oil",
    "cooking spray",
    "sugar",
];

/// Canonicalizes ingredient text into [`IngredientToken`]s
#[derive(Debug, Clone)]
pub struct IngredientNormalizer {
    staples: HashSet<String>,
}

impl Default for IngredientNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl IngredientNormalizer {
    /// Normalizer with the default pantry staple list
    #[must_use]
    pub fn new() -> Self {
        let mut normalizer = Self {
            staples: HashSet::new(),
        };
        let staples = PANTRY_STAPLES
            .iter()
            .map(|s| normalizer.normalize_text(s))
            .collect();
        normalizer.staples = staples;
        normalizer
    }

    /// Normalize raw text into a token, keeping the original
    #[must_use]
    pub fn normalize(&self, raw: &str) -> IngredientToken {
        IngredientToken::from_parts(self.normalize_text(raw), raw.trim())
    }

    /// Normalized comparison form of raw text
    #[must_use]
    pub fn normalize_text(&self, raw: &str) -> String {
        let lowered = raw.trim().to_lowercase().replace(['\'', '’'], "");
        let without_measure = MEASURE_PATTERN
            .as_ref()
            .map_or(lowered.as_str(), |re| {
                re.find(&lowered)
                    .map_or(lowered.as_str(), |m| &lowered[m.end()..])
            })
            .to_owned();

        let cleaned: String = without_measure
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c.is_whitespace() || c == '-' {
                    c
                } else {
                    ' '
                }
            })
            .collect();

        let words: Vec<String> = cleaned
            .split_whitespace()
            .map(|w| w.trim_matches('-'))
            .filter(|w| !w.is_empty())
            .map(singularize)
            .collect();

        join_qualifiers(&words).join(" ")
    }

    /// Token for one raw ingredient line, or `None` when nothing survives normalization
    #[must_use]
    pub fn token_for(&self, ingredient: &RawIngredient) -> Option<IngredientToken> {
        let text = ingredient.match_text()?;
        let normalized = self.normalize_text(text);
        if normalized.is_empty() {
            return None;
        }
        let original = ingredient.original.as_deref().unwrap_or(text).trim();
        Some(IngredientToken::from_parts(normalized, original))
    }

    /// Build a candidate from a raw record
    ///
    /// # Errors
    ///
    /// Returns `MalformedCollaboratorResponse` when the record lacks an id or title
    pub fn candidate(
        &self,
        raw: RawRecipe,
        origin: CandidateOrigin,
        collaborator: &str,
    ) -> Result<Candidate, EngineError> {
        Candidate::from_raw(raw, origin, collaborator, |ingredient| {
            self.token_for(ingredient)
        })
    }

    /// True when the token is a pantry staple
    #[must_use]
    pub fn is_staple(&self, token: &IngredientToken) -> bool {
        self.staples.contains(token.normalized())
    }

    /// True when one token's words are all contained in the other's
    ///
    /// "tomato" matches "cherry tomato" and vice versa; "tomato" does not match "potato".
    #[must_use]
    pub fn matches(&self, a: &IngredientToken, b: &IngredientToken) -> bool {
        if a.is_empty() || b.is_empty() {
            return false;
        }
        if a == b {
            return true;
        }
        let a_words: HashSet<&str> = a.words().collect();
        let b_words: HashSet<&str> = b.words().collect();
        a_words.is_subset(&b_words) || b_words.is_subset(&a_words)
    }
}

/// Reduce an English plural to its singular form
#[must_use]
pub fn singularize(word: &str) -> String {
    if word.len() <= 3 || INVARIANT_WORDS.contains(&word) {
        return word.to_owned();
    }
    if let Some((_, singular)) = IRREGULAR_PLURALS.iter().find(|(plural, _)| *plural == word) {
        return (*singular).to_owned();
    }
    if let Some(stem) = word.strip_suffix("ies") {
        if stem.len() >= 2 {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = word.strip_suffix("oes") {
        return format!("{stem}o");
    }
    if ["ches", "shes", "xes", "sses"]
        .iter()
        .any(|suffix| word.ends_with(suffix))
    {
        return word[..word.len() - 2].to_owned();
    }
    if word.ends_with('s') && !["ss", "us", "is"].iter().any(|s| word.ends_with(s)) {
        return word[..word.len() - 1].to_owned();
    }
    word.to_owned()
}

/// Fold "dairy free" into "dairy-free" and "non dairy" into "non-dairy"
fn join_qualifiers(words: &[String]) -> Vec<String> {
    let mut joined: Vec<String> = Vec::with_capacity(words.len());
    let mut iter = words.iter().peekable();
    while let Some(word) = iter.next() {
        if word == "non" {
            if let Some(next) = iter.next() {
                joined.push(format!("non-{next}"));
                continue;
            }
        }
        if let Some(next) = iter.peek() {
            if next.as_str() == "free" && word.chars().all(char::is_alphabetic) {
                joined.push(format!("{word}-free"));
                iter.next();
                continue;
            }
        }
        joined.push(word.clone());
    }
    joined
}
