// ABOUTME: Ingredient prioritizer splitting the pantry into core and secondary items
// ABOUTME: Delegates the judgement to the arbiter and validates totality before using the answer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use pantry_core::models::{IngredientToken, QuotaBudget};
use pantry_intelligence::{reconcile_partition, IngredientNormalizer, Partition};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::collaborators::RecipeArbiter;
use crate::config::RetryPolicy;
use crate::retry::call_with_retry;

/// Partitions a user's ingredients for a reduced-set search
pub struct IngredientPrioritizer {
    arbiter: Arc<dyn RecipeArbiter>,
    normalizer: IngredientNormalizer,
    retry: RetryPolicy,
}

impl IngredientPrioritizer {
    /// Create a prioritizer over the given arbiter
    #[must_use]
    pub fn new(
        arbiter: Arc<dyn RecipeArbiter>,
        normalizer: IngredientNormalizer,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            arbiter,
            normalizer,
            retry,
        }
    }

    /// Split `ingredients` into `(core, secondary)`.
    ///
    /// `core ∪ secondary` always equals the deduplicated input and `core` is
    /// non-empty whenever the input is. Any arbiter failure or structurally
    /// invalid answer yields every ingredient as core. The arbiter call never
    /// runs past `deadline`.
    pub async fn partition(
        &self,
        ingredients: &[IngredientToken],
        budget: QuotaBudget,
        deadline: Instant,
    ) -> (Partition, QuotaBudget) {
        if ingredients.is_empty() {
            return (Partition::all_core(Vec::new(), "no ingredients"), budget);
        }

        let names: Vec<String> = ingredients.iter().map(|t| t.original().to_owned()).collect();
        let arbiter = self.arbiter.name().to_owned();
        let (response, budget) = call_with_retry(
            &arbiter,
            "categorize",
            &self.retry,
            budget,
            deadline,
            || self.arbiter.categorize(&names),
        )
        .await;

        let partition = match response {
            Ok(answer) => reconcile_partition(
                &self.normalizer,
                ingredients,
                &answer.core,
                &answer.secondary,
            ),
            Err(e) => {
                warn!(arbiter = %arbiter, error = %e, "Categorization unavailable, keeping every ingredient");
                let mut unique: Vec<IngredientToken> = Vec::with_capacity(ingredients.len());
                for token in ingredients {
                    if !unique.contains(token) {
                        unique.push(token.clone());
                    }
                }
                Partition::all_core(unique, format!("categorization failed: {e}"))
            }
        };

        info!(
            core = partition.core.len(),
            secondary = partition.secondary.len(),
            source = ?partition.source,
            "Ingredient partition ready"
        );
        (partition, budget)
    }
}
