// ABOUTME: Collaborator contracts for recipe discovery and the external arbiter
// ABOUTME: Request/response types are validated at this boundary before the pipeline sees them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Collaborators
//!
//! The engine depends on two external services through async traits:
//!
//! - [`RecipeDiscovery`]: searches a recipe database and enriches summaries
//! - [`RecipeArbiter`]: validates ambiguous candidates, categorizes
//!   ingredients, generates last-resort recipes, and suggests stand-ins for
//!   missing ingredients
//!
//! Every call returns `Result<_, CollaboratorError>`. The orchestrator wraps
//! each call with a timeout, bounded retries, and the request's quota budget.

/// File-backed discovery collaborator
pub mod fixture;
/// Rule-based arbiter used when no language model is configured
pub mod heuristic;

pub use fixture::FixtureDiscovery;
pub use heuristic::HeuristicArbiter;

use async_trait::async_trait;
use pantry_core::errors::CollaboratorError;
use pantry_core::models::{RawRecipe, SemanticTag, UserConstraints};
use serde::{Deserialize, Serialize};

// ============================================================================
// Discovery
// ============================================================================

/// Search request sent to the discovery collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryQuery {
    /// Ingredients the recipes should use
    pub ingredients: Vec<String>,
    /// Cuisine filter
    pub cuisine: Option<String>,
    /// Meal type filter
    pub meal_type: Option<String>,
    /// Diet filters
    pub diets: Vec<String>,
    /// Intolerance filters
    pub intolerances: Vec<String>,
    /// Maximum records to return
    pub limit: usize,
}

impl DiscoveryQuery {
    /// Query carrying every tag the constraints still enforce
    #[must_use]
    pub fn from_constraints(constraints: &UserConstraints, limit: usize) -> Self {
        let mut query = Self {
            ingredients: constraints.ingredient_names(),
            cuisine: None,
            meal_type: None,
            diets: Vec::new(),
            intolerances: constraints
                .intolerances()
                .iter()
                .map(|i| i.as_str().to_owned())
                .collect(),
            limit,
        };
        for tag in constraints.semantic_requirements() {
            match tag {
                SemanticTag::Cuisine(cuisine) => query.cuisine = Some(cuisine),
                SemanticTag::MealType(meal) => query.meal_type = Some(meal),
                SemanticTag::Diet(diet) => query.diets.push(diet.as_str().to_owned()),
            }
        }
        query
    }

    /// True when the query filters on any semantic tag
    #[must_use]
    pub fn has_tags(&self) -> bool {
        self.cuisine.is_some() || self.meal_type.is_some() || !self.diets.is_empty()
    }
}

/// Recipe database collaborator
#[async_trait]
pub trait RecipeDiscovery: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Recipes matching an ingredient list and optional tags.
    ///
    /// Records may be summaries (no ingredient list); the orchestrator
    /// enriches those before evaluation.
    async fn search(&self, query: &DiscoveryQuery) -> Result<Vec<RawRecipe>, CollaboratorError>;

    /// Full records for the given identifiers
    async fn enrich(&self, ids: &[String]) -> Result<Vec<RawRecipe>, CollaboratorError>;
}

// ============================================================================
// Arbiter
// ============================================================================

/// What the arbiter is asked to confirm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewKind {
    /// Resolve a NEEDS_REVIEW safety verdict
    Safety,
    /// Confirm a failed semantic tag
    Semantic,
}

/// One candidate sent to the arbiter for review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRequest {
    /// Candidate under review
    pub candidate_id: String,
    /// Candidate title
    pub title: String,
    /// Original ingredient text
    pub ingredients: Vec<String>,
    /// Constraint the candidate failed ("dairy intolerance", "cuisine: italian")
    pub constraint: String,
    /// Kind of review
    pub kind: ReviewKind,
}

/// Arbiter decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArbiterDecision {
    /// The candidate satisfies the constraint
    Pass,
    /// The candidate does not satisfy the constraint
    Reject,
}

/// Validated arbiter response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbiterVerdict {
    decision: ArbiterDecision,
    confidence: f64,
    reason: String,
}

impl ArbiterVerdict {
    /// Build a verdict, rejecting confidence outside `[0, 1]`
    ///
    /// # Errors
    ///
    /// Returns `CollaboratorError::Malformed` for an out-of-range or non-finite confidence
    pub fn new(
        decision: ArbiterDecision,
        confidence: f64,
        reason: impl Into<String>,
    ) -> Result<Self, CollaboratorError> {
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(CollaboratorError::Malformed(format!(
                "confidence {confidence} is outside [0, 1]"
            )));
        }
        Ok(Self {
            decision,
            confidence,
            reason: reason.into(),
        })
    }

    /// Decision
    #[must_use]
    pub const fn decision(&self) -> ArbiterDecision {
        self.decision
    }

    /// Self-reported confidence in `[0, 1]`
    #[must_use]
    pub const fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Stated reason
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// PASS with confidence strictly above `threshold`
    #[must_use]
    pub fn accepts(&self, threshold: f64) -> bool {
        self.decision == ArbiterDecision::Pass && self.confidence > threshold
    }
}

/// Arbiter's core/secondary split, unvalidated against the input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizationResponse {
    /// Defining ingredients
    pub core: Vec<String>,
    /// Seasoning and garnish ingredients
    pub secondary: Vec<String>,
}

/// Last-resort generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Ingredients to build recipes around
    pub ingredients: Vec<String>,
    /// Dietary requirements the recipes must respect
    pub diets: Vec<String>,
    /// Intolerances the recipes must respect
    pub intolerances: Vec<String>,
    /// Preferred cuisine
    pub cuisine: Option<String>,
    /// Preferred meal type
    pub meal_type: Option<String>,
    /// Recipes wanted
    pub count: usize,
}

impl GenerationRequest {
    /// Request built from the original constraints
    #[must_use]
    pub fn from_constraints(constraints: &UserConstraints, count: usize) -> Self {
        Self {
            ingredients: constraints.ingredient_names(),
            diets: constraints
                .diets()
                .iter()
                .map(|d| d.as_str().to_owned())
                .collect(),
            intolerances: constraints
                .intolerances()
                .iter()
                .map(|i| i.as_str().to_owned())
                .collect(),
            cuisine: constraints.cuisine().map(str::to_owned),
            meal_type: constraints.meal_type().map(str::to_owned),
            count,
        }
    }
}

/// One missing ingredient the arbiter is asked to replace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionRequest {
    /// Ingredient the user lacks
    pub missing_item: String,
    /// Recipe it belongs to
    pub recipe_title: String,
    /// What the user has
    pub pantry: Vec<String>,
    /// Dietary requirements the stand-in must respect
    pub diets: Vec<String>,
    /// Intolerances the stand-in must respect
    pub intolerances: Vec<String>,
}

impl SubstitutionRequest {
    /// Request for one missing item under the original constraints
    #[must_use]
    pub fn from_constraints(
        constraints: &UserConstraints,
        recipe_title: &str,
        missing_item: &str,
    ) -> Self {
        let generation = GenerationRequest::from_constraints(constraints, 0);
        Self {
            missing_item: missing_item.to_owned(),
            recipe_title: recipe_title.to_owned(),
            pantry: generation.ingredients,
            diets: generation.diets,
            intolerances: generation.intolerances,
        }
    }
}

/// Arbiter's stand-in for a missing ingredient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionSuggestion {
    /// Ingredient the user lacks
    pub missing_item: String,
    /// Suggested replacement, possibly a combination of items
    pub substitute: String,
    /// Short cooking advice
    pub tip: Option<String>,
}

/// External arbiter collaborator
#[async_trait]
pub trait RecipeArbiter: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Judge one candidate against one failed constraint
    async fn validate(
        &self,
        request: &ValidationRequest,
    ) -> Result<ArbiterVerdict, CollaboratorError>;

    /// Split ingredients into core and secondary sets
    async fn categorize(
        &self,
        ingredients: &[String],
    ) -> Result<CategorizationResponse, CollaboratorError>;

    /// Produce new candidate records
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<RawRecipe>, CollaboratorError>;

    /// Suggest a stand-in for one missing ingredient
    async fn suggest_substitutes(
        &self,
        request: &SubstitutionRequest,
    ) -> Result<SubstitutionSuggestion, CollaboratorError>;
}
