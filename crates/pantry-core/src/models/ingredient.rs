// ABOUTME: Normalized ingredient token paired with its original text
// ABOUTME: Immutable once produced by the ingredient normalizer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A normalized ingredient token.
///
/// Produced once per raw ingredient string and never mutated. Equality and
/// hashing only consider the normalized form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientToken {
    normalized: String,
    original: String,
}

impl IngredientToken {
    /// Build a token from an already-normalized form and its source text
    #[must_use]
    pub fn from_parts(normalized: impl Into<String>, original: impl Into<String>) -> Self {
        Self {
            normalized: normalized.into(),
            original: original.into(),
        }
    }

    /// Normalized comparison form
    #[must_use]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Text as it arrived from the source
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Whitespace-separated words of the normalized form
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.normalized.split_whitespace()
    }

    /// True when normalization left nothing to compare
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

impl PartialEq for IngredientToken {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized
    }
}

impl Eq for IngredientToken {}

impl Hash for IngredientToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized.hash(state);
    }
}
