// ABOUTME: Rule-based arbiter used when no language model is configured
// ABOUTME: Categorizes ingredients by pattern and declines validation so ambiguity fails closed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use pantry_core::errors::CollaboratorError;
use pantry_core::models::RawRecipe;
use pantry_intelligence::IngredientNormalizer;

use super::{
    ArbiterVerdict, CategorizationResponse, GenerationRequest, RecipeArbiter,
    SubstitutionRequest, SubstitutionSuggestion, ValidationRequest,
};

/// Ingredients that usually define a dish: proteins, starches, and bases
const CORE_PATTERNS: &[&str] = &[
    "chicken", "beef", "pork", "lamb", "turkey", "fish", "salmon", "shrimp", "tofu", "tempeh",
    "bean", "lentil", "chickpea", "egg", "rice", "pasta", "noodle", "potato", "bread", "flour",
    "tortilla", "quinoa", "oat", "milk", "cheese", "tomato", "onion", "garlic",
];

/// Ingredients kept as core when no pattern matches
const FALLBACK_CORE_COUNT: usize = 3;

/// Offline arbiter.
///
/// `validate` always reports the operation unsupported, so NEEDS_REVIEW
/// candidates are rejected and RESCUE candidates stay RESCUE. `generate`
/// produces nothing and substitution advice is unsupported.
#[derive(Debug, Clone, Default)]
pub struct HeuristicArbiter {
    normalizer: IngredientNormalizer,
}

impl HeuristicArbiter {
    /// Create the arbiter
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn is_core(&self, ingredient: &str) -> bool {
        let token = self.normalizer.normalize(ingredient);
        let mut words = token.words();
        words.any(|word| CORE_PATTERNS.iter().any(|p| word == *p || word.ends_with(*p)))
    }
}

#[async_trait]
impl RecipeArbiter for HeuristicArbiter {
    fn name(&self) -> &'static str {
        "heuristic-arbiter"
    }

    async fn validate(
        &self,
        request: &ValidationRequest,
    ) -> Result<ArbiterVerdict, CollaboratorError> {
        Err(CollaboratorError::Unsupported(format!(
            "no reviewer available for {} on {}",
            request.constraint, request.candidate_id
        )))
    }

    async fn categorize(
        &self,
        ingredients: &[String],
    ) -> Result<CategorizationResponse, CollaboratorError> {
        let (core, secondary): (Vec<String>, Vec<String>) =
            ingredients.iter().cloned().partition(|i| self.is_core(i));
        if core.is_empty() {
            let split = ingredients.len().min(FALLBACK_CORE_COUNT);
            return Ok(CategorizationResponse {
                core: ingredients[..split].to_vec(),
                secondary: ingredients[split..].to_vec(),
            });
        }
        Ok(CategorizationResponse { core, secondary })
    }

    async fn generate(
        &self,
        _request: &GenerationRequest,
    ) -> Result<Vec<RawRecipe>, CollaboratorError> {
        Ok(Vec::new())
    }

    async fn suggest_substitutes(
        &self,
        request: &SubstitutionRequest,
    ) -> Result<SubstitutionSuggestion, CollaboratorError> {
        Err(CollaboratorError::Unsupported(format!(
            "no substitution advice available for {}",
            request.missing_item
        )))
    }
}
