// ABOUTME: Recipe decision algorithms: normalization, dietary safety, scoring, and tiering
// ABOUTME: Deterministic synchronous core used by the async orchestrator in the main crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pantry Intelligence
//!
//! The deterministic half of the recipe decision engine. Nothing in this crate
//! performs I/O or awaits; collaborator calls and stage sequencing live in the
//! main crate.
//!
//! - **normalizer**: canonical ingredient tokens and candidate construction
//! - **safety**: three-layer dietary safety classifier with per-family keyword tables
//! - **semantic**: cuisine, meal type, and diet label checks
//! - **scoring**: continuous fit score with soft penalties and mood bonuses
//! - **tiers**: monotonic confidence tier ledger with provenance
//! - **partition**: structural validation of core/secondary ingredient partitions
//! - **pipeline**: parallel per-candidate evaluation with stage barriers

/// Scoring and safety configuration with validation
pub mod config;
/// Ingredient normalization
pub mod normalizer;
/// Core/secondary ingredient partition reconciliation
pub mod partition;
/// Parallel candidate evaluation
pub mod pipeline;
/// Dietary safety filter
pub mod safety;
/// Fit scoring
pub mod scoring;
/// Semantic tag checks
pub mod semantic;
/// Confidence tier ledger
pub mod tiers;

pub use config::{ConfigError, SafetyConfig, ScoringConfig};
pub use normalizer::IngredientNormalizer;
pub use partition::{reconcile_partition, Partition, PartitionSource};
pub use pipeline::{CandidateEvaluator, Evaluation};
pub use safety::{rules_for, DietarySafetyFilter, RestrictionFamily, SafetyRule};
pub use scoring::{FitScore, ScoreAdjustment, ScoreBreakdown, ScoringEngine};
pub use semantic::failed_tags;
pub use tiers::{ProvenanceEvent, ProvenanceKind, TierError, TierLedger};
