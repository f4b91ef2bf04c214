// ABOUTME: Configuration for the deterministic decision algorithms
// ABOUTME: Scoring weight tables, penalty rates, and safety filter settings with validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Algorithm configuration.
//!
//! Every struct has a `Default` built from `pantry_core::constants` and a
//! `validate` method. Structs are serde-enabled so a caller may load them
//! from JSON.

mod error;
mod safety;
mod scoring;

pub use error::ConfigError;
pub use safety::SafetyConfig;
pub use scoring::{Bonuses, MoodVector, MoodWeights, PenaltyRates, ProfileWeights, ScoringConfig, WeightPair};
