// ABOUTME: Shared test utilities and fixtures for PantryChef integration tests
// ABOUTME: Scripted collaborators, an LLM provider stub, and candidate/constraint builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `pantry_chef`

use std::collections::{HashMap, VecDeque};
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use pantry_chef::collaborators::{
    ArbiterDecision, ArbiterVerdict, CategorizationResponse, DiscoveryQuery, GenerationRequest,
    RecipeArbiter, RecipeDiscovery, ReviewKind, SubstitutionRequest, SubstitutionSuggestion,
    ValidationRequest,
};
use pantry_chef::config::{EngineConfig, RetryPolicy};
use pantry_chef::llm::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider};
use pantry_core::errors::{AppError, CollaboratorError};
use pantry_core::models::{
    Candidate, CandidateOrigin, ConstraintsRequest, RawRecipe, UserConstraints,
};
use pantry_intelligence::IngredientNormalizer;
use tokio::time::{sleep, Instant};
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };
        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// Builders
// ============================================================================

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

pub fn parse_constraints(ingredients: &[&str], request: &ConstraintsRequest) -> UserConstraints {
    let normalizer = IngredientNormalizer::new();
    UserConstraints::parse(&strings(ingredients), request, |raw| normalizer.normalize(raw))
        .expect("constraints should parse")
}

pub fn diet_request(diets: &[&str]) -> ConstraintsRequest {
    ConstraintsRequest {
        diets: strings(diets),
        ..ConstraintsRequest::default()
    }
}

pub fn intolerance_request(intolerances: &[&str]) -> ConstraintsRequest {
    ConstraintsRequest {
        intolerances: strings(intolerances),
        ..ConstraintsRequest::default()
    }
}

pub fn candidate(raw: RawRecipe) -> Candidate {
    IngredientNormalizer::new()
        .candidate(raw, CandidateOrigin::Discovery, "test")
        .expect("recipe should build a candidate")
}

pub fn candidate_with(id: &str, title: &str, ingredients: &[&str]) -> Candidate {
    candidate(RawRecipe::new(id, title).with_ingredients(ingredients))
}

/// A deadline no test reaches
pub fn far_deadline() -> Instant {
    Instant::now() + Duration::from_secs(3_600)
}

/// Config with fast retries and a generous budget for deterministic tests
pub fn test_config() -> EngineConfig {
    EngineConfig {
        retry: RetryPolicy {
            max_attempts: 2,
            initial_backoff_ms: 10,
            max_backoff_ms: 20,
            call_timeout_ms: 1_000,
        },
        ..EngineConfig::default()
    }
}

// ============================================================================
// Scripted arbiter
// ============================================================================

/// How the scripted arbiter answers a validation call
#[derive(Debug, Clone)]
pub enum Answer {
    Verdict(ArbiterDecision, f64),
    Fail(CollaboratorError),
    Hang,
}

/// Arbiter whose answers are set per test
pub struct ScriptedArbiter {
    safety_default: Answer,
    semantic_default: Answer,
    per_candidate: HashMap<String, Answer>,
    categorization: Option<CategorizationResponse>,
    generated: Vec<RawRecipe>,
    substitutes: HashMap<String, String>,
    pub validate_calls: AtomicUsize,
    pub categorize_calls: AtomicUsize,
    pub generate_calls: AtomicUsize,
    pub suggest_calls: AtomicUsize,
    pub seen: Mutex<Vec<ValidationRequest>>,
    pub substitution_requests: Mutex<Vec<SubstitutionRequest>>,
}

impl ScriptedArbiter {
    /// Rejects everything with low confidence, no categorization, no generation
    pub fn new() -> Self {
        Self {
            safety_default: Answer::Verdict(ArbiterDecision::Reject, 0.9),
            semantic_default: Answer::Verdict(ArbiterDecision::Reject, 0.9),
            per_candidate: HashMap::new(),
            categorization: None,
            generated: Vec::new(),
            substitutes: HashMap::new(),
            validate_calls: AtomicUsize::new(0),
            categorize_calls: AtomicUsize::new(0),
            generate_calls: AtomicUsize::new(0),
            suggest_calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            substitution_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_safety(mut self, answer: Answer) -> Self {
        self.safety_default = answer;
        self
    }

    pub fn with_semantic(mut self, answer: Answer) -> Self {
        self.semantic_default = answer;
        self
    }

    pub fn answer_for(mut self, candidate_id: &str, answer: Answer) -> Self {
        self.per_candidate.insert(candidate_id.to_owned(), answer);
        self
    }

    pub fn with_categorization(mut self, core: &[&str], secondary: &[&str]) -> Self {
        self.categorization = Some(CategorizationResponse {
            core: strings(core),
            secondary: strings(secondary),
        });
        self
    }

    pub fn with_generated(mut self, recipes: Vec<RawRecipe>) -> Self {
        self.generated = recipes;
        self
    }

    pub fn with_substitute(mut self, missing_item: &str, substitute: &str) -> Self {
        self.substitutes
            .insert(missing_item.to_owned(), substitute.to_owned());
        self
    }

    pub fn validations(&self) -> usize {
        self.validate_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecipeArbiter for ScriptedArbiter {
    fn name(&self) -> &str {
        "scripted-arbiter"
    }

    async fn validate(
        &self,
        request: &ValidationRequest,
    ) -> Result<ArbiterVerdict, CollaboratorError> {
        self.validate_calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.clone());
        let answer = self
            .per_candidate
            .get(&request.candidate_id)
            .cloned()
            .unwrap_or_else(|| match request.kind {
                ReviewKind::Safety => self.safety_default.clone(),
                ReviewKind::Semantic => self.semantic_default.clone(),
            });
        match answer {
            Answer::Verdict(decision, confidence) => {
                ArbiterVerdict::new(decision, confidence, "scripted")
            }
            Answer::Fail(error) => Err(error),
            Answer::Hang => {
                sleep(Duration::from_secs(3_600)).await;
                Err(CollaboratorError::Unavailable("hung".to_owned()))
            }
        }
    }

    async fn categorize(
        &self,
        _ingredients: &[String],
    ) -> Result<CategorizationResponse, CollaboratorError> {
        self.categorize_calls.fetch_add(1, Ordering::SeqCst);
        self.categorization
            .clone()
            .ok_or_else(|| CollaboratorError::Unsupported("categorize".to_owned()))
    }

    async fn generate(
        &self,
        _request: &GenerationRequest,
    ) -> Result<Vec<RawRecipe>, CollaboratorError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.generated.clone())
    }

    async fn suggest_substitutes(
        &self,
        request: &SubstitutionRequest,
    ) -> Result<SubstitutionSuggestion, CollaboratorError> {
        self.suggest_calls.fetch_add(1, Ordering::SeqCst);
        self.substitution_requests
            .lock()
            .unwrap()
            .push(request.clone());
        self.substitutes
            .get(&request.missing_item)
            .map(|substitute| SubstitutionSuggestion {
                missing_item: request.missing_item.clone(),
                substitute: substitute.clone(),
                tip: Some("scripted".to_owned()),
            })
            .ok_or_else(|| CollaboratorError::Unsupported(request.missing_item.clone()))
    }
}

// ============================================================================
// Failing discovery
// ============================================================================

/// Discovery that always fails with the given error
pub struct FailingDiscovery {
    error: CollaboratorError,
    pub calls: AtomicUsize,
}

impl FailingDiscovery {
    pub fn new(error: CollaboratorError) -> Self {
        Self {
            error,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RecipeDiscovery for FailingDiscovery {
    fn name(&self) -> &str {
        "failing-discovery"
    }

    async fn search(&self, _query: &DiscoveryQuery) -> Result<Vec<RawRecipe>, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }

    async fn enrich(&self, _ids: &[String]) -> Result<Vec<RawRecipe>, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }
}

// ============================================================================
// Scripted LLM provider
// ============================================================================

/// Provider returning queued responses in order and recording every request
pub struct ScriptedLlmProvider {
    responses: Mutex<VecDeque<Result<String, AppError>>>,
    capabilities: LlmCapabilities,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedLlmProvider {
    pub fn new(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            capabilities: LlmCapabilities::JSON_MODE | LlmCapabilities::SYSTEM_MESSAGES,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(content: &str) -> Self {
        Self::new(vec![Ok(content.to_owned())])
    }

    pub fn text_only(mut self) -> Self {
        self.capabilities = LlmCapabilities::text_only();
        self
    }

    pub fn last_request(&self) -> ChatRequest {
        self.requests.lock().unwrap().last().cloned().expect("a request was made")
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlmProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.capabilities
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::external_service("scripted", "no response queued")));
        next.map(|content| ChatResponse {
            content,
            model: "scripted-model".to_owned(),
        })
    }
}

pub fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
