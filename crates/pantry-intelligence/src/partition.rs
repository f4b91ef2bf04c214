// ABOUTME: Structural validation of an arbiter's core/secondary ingredient partition
// ABOUTME: Falls back to core = all, secondary = [] whenever the response is not a total partition
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashSet;

use pantry_core::models::IngredientToken;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::normalizer::IngredientNormalizer;

/// Where a partition came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionSource {
    /// Arbiter response passed validation
    Arbiter,
    /// Arbiter response was unusable
    Fallback,
}

/// Core and secondary ingredients. `core ∪ secondary` always equals the input set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// Ingredients to keep in a reduced search
    pub core: Vec<IngredientToken>,
    /// Ingredients that may be dropped
    pub secondary: Vec<IngredientToken>,
    /// Origin of the split
    pub source: PartitionSource,
    /// Why the arbiter response was discarded
    pub fallback_reason: Option<String>,
}

impl Partition {
    /// Everything core, nothing secondary
    #[must_use]
    pub fn all_core(input: Vec<IngredientToken>, reason: impl Into<String>) -> Self {
        Self {
            core: input,
            secondary: Vec::new(),
            source: PartitionSource::Fallback,
            fallback_reason: Some(reason.into()),
        }
    }

    /// True when dropping the secondary set would change the search
    #[must_use]
    pub fn is_reducible(&self) -> bool {
        !self.secondary.is_empty() && !self.core.is_empty()
    }

    /// Original text of the secondary ingredients
    #[must_use]
    pub fn secondary_names(&self) -> Vec<String> {
        self.secondary.iter().map(|t| t.original().to_owned()).collect()
    }
}

/// Validate an arbiter's `core`/`secondary` answer against the input.
///
/// The answer is used only if every returned item maps to an input token,
/// nothing is duplicated, nothing is dropped, and `core` is non-empty.
#[must_use]
pub fn reconcile_partition(
    normalizer: &IngredientNormalizer,
    input: &[IngredientToken],
    core: &[String],
    secondary: &[String],
) -> Partition {
    let mut unique: Vec<IngredientToken> = Vec::with_capacity(input.len());
    for token in input {
        if !unique.contains(token) {
            unique.push(token.clone());
        }
    }

    match split(normalizer, &unique, core, secondary) {
        Ok((core, secondary)) => Partition {
            core,
            secondary,
            source: PartitionSource::Arbiter,
            fallback_reason: None,
        },
        Err(reason) => {
            warn!(reason = %reason, "Discarding ingredient partition");
            Partition::all_core(unique, reason)
        }
    }
}

fn split(
    normalizer: &IngredientNormalizer,
    input: &[IngredientToken],
    core: &[String],
    secondary: &[String],
) -> Result<(Vec<IngredientToken>, Vec<IngredientToken>), String> {
    if core.is_empty() {
        return Err("core set is empty".to_owned());
    }
    let mut seen: HashSet<usize> = HashSet::with_capacity(input.len());
    let mut resolve = |items: &[String]| -> Result<Vec<IngredientToken>, String> {
        let mut tokens = Vec::with_capacity(items.len());
        for item in items {
            let normalized = normalizer.normalize_text(item);
            let index = input
                .iter()
                .position(|t| t.normalized() == normalized)
                .ok_or_else(|| format!("unknown ingredient '{item}'"))?;
            if !seen.insert(index) {
                return Err(format!("ingredient '{item}' appears more than once"));
            }
            tokens.push(input[index].clone());
        }
        Ok(tokens)
    };
    let core = resolve(core)?;
    let secondary = resolve(secondary)?;
    if seen.len() != input.len() {
        return Err(format!(
            "{} of {} ingredients missing from response",
            input.len() - seen.len(),
            input.len()
        ));
    }
    Ok((core, secondary))
}
