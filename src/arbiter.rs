// ABOUTME: Language-model arbiter adapter with a strict schema-validating response boundary
// ABOUTME: Builds prompts, extracts JSON from free text, and rejects any response off-schema
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LLM Arbiter
//!
//! Every response is parsed into a private `Llm*Response` struct with all
//! fields required, then checked again (verdict enum, confidence range,
//! record shape) before anything reaches the pipeline. Anything else becomes
//! `CollaboratorError::Malformed`.

use std::sync::LazyLock;

use async_trait::async_trait;
use pantry_core::errors::CollaboratorError;
use pantry_core::models::{RawRecipe, RecipeId};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::collaborators::{
    ArbiterDecision, ArbiterVerdict, CategorizationResponse, GenerationRequest, RecipeArbiter,
    ReviewKind, SubstitutionRequest, SubstitutionSuggestion, ValidationRequest,
};
use crate::llm::prompts::{
    get_ingredient_categorization_prompt, get_ingredient_substitution_prompt,
    get_recipe_generation_prompt, get_safety_validation_prompt,
};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};

/// Fenced code block, with or without a `json` tag
static FENCED_JSON: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)```").ok());

/// Sampling temperature for judgement calls
const REVIEW_TEMPERATURE: f32 = 0.1;

/// Sampling temperature for recipe generation
const GENERATION_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Deserialize)]
struct LlmVerdictResponse {
    verdict: String,
    confidence: f64,
    reason: String,
}

impl LlmVerdictResponse {
    fn into_verdict(self) -> Result<ArbiterVerdict, CollaboratorError> {
        let decision = match self.verdict.trim().to_uppercase().as_str() {
            "PASS" => ArbiterDecision::Pass,
            "REJECT" => ArbiterDecision::Reject,
            other => {
                return Err(CollaboratorError::Malformed(format!(
                    "unknown verdict '{other}'"
                )))
            }
        };
        ArbiterVerdict::new(decision, self.confidence, self.reason)
    }
}

#[derive(Debug, Deserialize)]
struct LlmCategorizationResponse {
    core: Vec<String>,
    secondary: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LlmSubstitutionResponse {
    substitute: String,
    tip: String,
}

impl LlmSubstitutionResponse {
    fn into_suggestion(
        self,
        missing_item: &str,
    ) -> Result<SubstitutionSuggestion, CollaboratorError> {
        let substitute = self.substitute.trim();
        if substitute.is_empty() {
            return Err(CollaboratorError::Malformed(format!(
                "empty substitute for '{missing_item}'"
            )));
        }
        let tip = self.tip.trim();
        Ok(SubstitutionSuggestion {
            missing_item: missing_item.to_owned(),
            substitute: substitute.to_owned(),
            tip: (!tip.is_empty()).then(|| tip.to_owned()),
        })
    }
}

#[derive(Debug, Deserialize)]
struct LlmGenerationResponse {
    recipes: Vec<Value>,
}

/// Arbiter backed by an [`LlmProvider`]
pub struct LlmArbiter<P: LlmProvider> {
    provider: P,
    model: Option<String>,
}

impl<P: LlmProvider> LlmArbiter<P> {
    /// Wrap a provider
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self {
            provider,
            model: None,
        }
    }

    /// Override the provider's default model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// The wrapped provider
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    async fn ask(
        &self,
        system_prompt: &str,
        user_message: String,
        temperature: f32,
    ) -> Result<String, CollaboratorError> {
        let messages = if self.provider.capabilities().supports_system_messages() {
            vec![
                ChatMessage::system(system_prompt),
                ChatMessage::user(user_message),
            ]
        } else {
            vec![ChatMessage::user(format!("{system_prompt}\n\n{user_message}"))]
        };
        let mut request = ChatRequest::new(messages).with_temperature(temperature);
        if self.provider.capabilities().supports_json_mode() {
            request = request.with_json_mode();
        }
        if let Some(model) = &self.model {
            request = request.with_model(model.clone());
        }

        let response = self.provider.complete(&request).await.map_err(|e| {
            CollaboratorError::Unavailable(format!("{}: {e}", self.provider.name()))
        })?;
        debug!(
            provider = self.provider.name(),
            model = %response.model,
            chars = response.content.len(),
            "Arbiter response received"
        );
        Ok(response.content)
    }
}

#[async_trait]
impl<P: LlmProvider> RecipeArbiter for LlmArbiter<P> {
    fn name(&self) -> &str {
        self.provider.name()
    }

    async fn validate(
        &self,
        request: &ValidationRequest,
    ) -> Result<ArbiterVerdict, CollaboratorError> {
        let kind = match request.kind {
            ReviewKind::Safety => "dietary safety rule",
            ReviewKind::Semantic => "descriptive tag",
        };
        let message = format!(
            "Recipe: {}\nIngredients:\n- {}\n\nConstraint ({kind}): {}\n\nReturn your evaluation as JSON.",
            request.title,
            request.ingredients.join("\n- "),
            request.constraint
        );
        let content = self
            .ask(get_safety_validation_prompt(), message, REVIEW_TEMPERATURE)
            .await?;
        parse_json::<LlmVerdictResponse>(&content)?.into_verdict()
    }

    async fn categorize(
        &self,
        ingredients: &[String],
    ) -> Result<CategorizationResponse, CollaboratorError> {
        let message = format!(
            "Pantry ingredients: {}\n\nReturn the split as JSON.",
            ingredients.join(", ")
        );
        let content = self
            .ask(get_ingredient_categorization_prompt(), message, REVIEW_TEMPERATURE)
            .await?;
        let parsed = parse_json::<LlmCategorizationResponse>(&content)?;
        Ok(CategorizationResponse {
            core: parsed.core,
            secondary: parsed.secondary,
        })
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<RawRecipe>, CollaboratorError> {
        let mut message = format!(
            "Create {} recipes using: {}.",
            request.count,
            request.ingredients.join(", ")
        );
        if !request.diets.is_empty() {
            message.push_str(&format!("\nDietary requirements: {}.", request.diets.join(", ")));
        }
        if !request.intolerances.is_empty() {
            message.push_str(&format!(
                "\nIntolerances (never include): {}.",
                request.intolerances.join(", ")
            ));
        }
        if let Some(cuisine) = &request.cuisine {
            message.push_str(&format!("\nPreferred cuisine: {cuisine}."));
        }
        if let Some(meal) = &request.meal_type {
            message.push_str(&format!("\nMeal type: {meal}."));
        }

        let content = self
            .ask(get_recipe_generation_prompt(), message, GENERATION_TEMPERATURE)
            .await?;
        let parsed = parse_json::<LlmGenerationResponse>(&content)?;
        let total = parsed.recipes.len();
        let recipes: Vec<RawRecipe> = parsed
            .recipes
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<RawRecipe>(value) {
                Ok(recipe) => Some(recipe),
                Err(e) => {
                    warn!(error = %e, "Discarding generated recipe that fails the schema");
                    None
                }
            })
            .map(with_generated_id)
            .filter(|recipe| {
                let usable = recipe.validate(self.name()).is_ok() && !recipe.is_summary();
                if !usable {
                    warn!("Discarding generated recipe without title or ingredients");
                }
                usable
            })
            .collect();
        if total > 0 && recipes.is_empty() {
            return Err(CollaboratorError::Malformed(
                "no generated recipe passed validation".to_owned(),
            ));
        }
        Ok(recipes)
    }

    async fn suggest_substitutes(
        &self,
        request: &SubstitutionRequest,
    ) -> Result<SubstitutionSuggestion, CollaboratorError> {
        let mut message = format!(
            "Recipe: {}\nMissing ingredient: {}\nPantry: {}",
            request.recipe_title,
            request.missing_item,
            request.pantry.join(", ")
        );
        if !request.diets.is_empty() {
            message.push_str(&format!("\nDietary requirements: {}.", request.diets.join(", ")));
        }
        if !request.intolerances.is_empty() {
            message.push_str(&format!(
                "\nIntolerances (never include): {}.",
                request.intolerances.join(", ")
            ));
        }
        message.push_str("\n\nReturn the substitute as JSON.");

        let content = self
            .ask(get_ingredient_substitution_prompt(), message, REVIEW_TEMPERATURE)
            .await?;
        parse_json::<LlmSubstitutionResponse>(&content)?.into_suggestion(&request.missing_item)
    }
}

/// Generated records get a fresh `gen-` identifier unless they carry one
fn with_generated_id(mut recipe: RawRecipe) -> RawRecipe {
    if recipe.key().is_none_or(|k| k.trim().is_empty()) {
        recipe.id = Some(RecipeId::Text(format!("gen-{}", Uuid::new_v4())));
    }
    recipe
}

fn parse_json<T: DeserializeOwned>(content: &str) -> Result<T, CollaboratorError> {
    let json = extract_json(content)?;
    serde_json::from_str(&json).map_err(|e| {
        warn!("Arbiter response failed schema validation: {e}");
        CollaboratorError::Malformed(format!("schema mismatch: {e}"))
    })
}

/// Extract JSON from a response that might contain extra text
fn extract_json(response: &str) -> Result<String, CollaboratorError> {
    let trimmed = response.trim();
    if serde_json::from_str::<Value>(trimmed).is_ok() {
        return Ok(trimmed.to_owned());
    }

    if let Some(captures) = FENCED_JSON.as_ref().and_then(|re| re.captures(trimmed)) {
        if let Some(block) = captures.get(1) {
            let block = block.as_str().trim();
            if serde_json::from_str::<Value>(block).is_ok() {
                return Ok(block.to_owned());
            }
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            let candidate = &trimmed[start..=end];
            if serde_json::from_str::<Value>(candidate).is_ok() {
                return Ok(candidate.to_owned());
            }
        }
    }

    Err(CollaboratorError::Malformed(
        "could not extract JSON from arbiter response".to_owned(),
    ))
}
