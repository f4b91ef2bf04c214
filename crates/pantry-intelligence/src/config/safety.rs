// ABOUTME: Safety filter configuration
// ABOUTME: Controls the qualifier window inspected around restricted keywords
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pantry_core::constants::safety;
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Safety filter settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// Words inspected on each side of a restricted keyword for a qualifier
    pub safe_word_window: usize,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            safe_word_window: safety::SAFE_WORD_WINDOW,
        }
    }
}

impl SafetyConfig {
    /// Validate settings
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` when the window is zero or wider than five words
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.safe_word_window == 0 || self.safe_word_window > 5 {
            return Err(ConfigError::ValueOutOfRange(
                "safe_word_window must be between 1 and 5",
            ));
        }
        Ok(())
    }
}
