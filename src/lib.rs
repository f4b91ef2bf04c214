// ABOUTME: Main library entry point for the PantryChef recipe decision engine
// ABOUTME: Async orchestration over the deterministic safety, scoring, and tiering core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # `PantryChef`
//!
//! Decides which recipe candidates are safe, relevant, and well ranked for a
//! user's pantry and dietary constraints.
//!
//! ## Architecture
//!
//! - **`pantry-core`**: errors, domain models, constants
//! - **`pantry-intelligence`**: normalization, dietary safety filter, scoring,
//!   tier ledger, partition validation
//! - **this crate**: collaborator traits, the LLM arbiter adapter, bounded
//!   retry, the fallback orchestrator, and the engine facade
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pantry_chef::collaborators::{FixtureDiscovery, HeuristicArbiter};
//! use pantry_chef::config::EngineConfig;
//! use pantry_chef::engine::RecommendationEngine;
//! use pantry_chef::errors::AppResult;
//! use pantry_core::models::ConstraintsRequest;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let discovery = FixtureDiscovery::from_path("recipes.json").await?;
//!     let engine = RecommendationEngine::new(
//!         EngineConfig::from_env(),
//!         Arc::new(discovery),
//!         Arc::new(HeuristicArbiter::new()),
//!     )?;
//!
//!     let request = ConstraintsRequest {
//!         diets: vec!["vegetarian".to_owned()],
//!         ..ConstraintsRequest::default()
//!     };
//!     let ingredients = vec!["tomato".to_owned(), "basil".to_owned()];
//!     let recommendation = engine.recommend(&ingredients, &request).await?;
//!     for item in &recommendation.items {
//!         println!("{} {} {:.1}", item.tier.as_str(), item.title, item.fit_score);
//!     }
//!     Ok(())
//! }
//! ```

/// Schema-validating arbiter adapter over an LLM provider
pub mod arbiter;

/// Discovery and arbiter collaborator traits and offline implementations
pub mod collaborators;

/// Engine configuration and retry policy
pub mod config;

/// Recommendation facade
pub mod engine;

/// Error types re-exported from the core crate
pub mod errors;

/// LLM provider abstraction and prompts
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Fallback state machine
pub mod orchestrator;

/// Core/secondary ingredient partitioning
pub mod prioritizer;

/// Stand-ins for missing ingredients, screened by the safety filter
pub mod substitutions;

/// Bounded retry for collaborator calls
pub mod retry;

pub use arbiter::LlmArbiter;
pub use config::{EngineConfig, RetryPolicy};
pub use engine::{Explanation, RankedCandidate, Recommendation, RecommendationEngine};
pub use orchestrator::{PipelineStage, StageTrace, StageTransition};
