// ABOUTME: Engine configuration: stage thresholds, request budgets, and collaborator retry policy
// ABOUTME: Loaded from defaults, JSON, or PANTRY_* environment variables and validated once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::str::FromStr;
use std::time::Duration;

use pantry_core::constants::{orchestration, retry};
use pantry_intelligence::{ConfigError, SafetyConfig, ScoringConfig};
use serde::{Deserialize, Serialize};

/// Bounded retry with exponential backoff for collaborator calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Attempts per call, including the first
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_backoff_ms: u64,
    /// Upper bound on any single delay
    pub max_backoff_ms: u64,
    /// Timeout applied to each attempt
    pub call_timeout_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: retry::MAX_ATTEMPTS,
            initial_backoff_ms: retry::INITIAL_BACKOFF_MS,
            max_backoff_ms: retry::MAX_BACKOFF_MS,
            call_timeout_ms: retry::CALL_TIMEOUT_MS,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based): `initial * 2^(attempt-1)`, capped
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2_u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(
            self.initial_backoff_ms
                .saturating_mul(factor)
                .min(self.max_backoff_ms),
        )
    }

    /// Per-attempt timeout
    #[must_use]
    pub const fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// Validate ranges
    ///
    /// # Errors
    ///
    /// Returns an error when attempts or the timeout is zero, or the backoff bounds are inverted
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::ValueOutOfRange("retry.max_attempts must be at least 1"));
        }
        if self.call_timeout_ms == 0 {
            return Err(ConfigError::ValueOutOfRange("retry.call_timeout_ms must be positive"));
        }
        if self.initial_backoff_ms > self.max_backoff_ms {
            return Err(ConfigError::InvalidRange(
                "retry.initial_backoff_ms exceeds retry.max_backoff_ms",
            ));
        }
        Ok(())
    }
}

/// Full engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Validated candidates needed before a stage may finish the request
    pub min_validated: usize,
    /// Arbiter confidence that must be exceeded for a PASS to count
    pub arbiter_acceptance: f64,
    /// Wall-clock budget per request
    pub request_budget_ms: u64,
    /// Collaborator calls allowed per request
    pub quota_per_request: u32,
    /// Candidates requested per discovery search
    pub discovery_limit: usize,
    /// Recipes requested from the arbiter in the generation stage
    pub generation_count: usize,
    /// Arbiter reviews in flight at once
    pub review_concurrency: usize,
    /// Missing ingredients per recipe sent for substitution advice
    pub substitution_limit: usize,
    /// Collaborator retry policy
    pub retry: RetryPolicy,
    /// Scoring tables
    pub scoring: ScoringConfig,
    /// Safety filter settings
    pub safety: SafetyConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_validated: orchestration::MIN_VALIDATED,
            arbiter_acceptance: orchestration::ARBITER_ACCEPTANCE,
            request_budget_ms: orchestration::REQUEST_BUDGET_MS,
            quota_per_request: orchestration::QUOTA_PER_REQUEST,
            discovery_limit: orchestration::DISCOVERY_LIMIT,
            generation_count: orchestration::GENERATION_COUNT,
            review_concurrency: orchestration::REVIEW_CONCURRENCY,
            substitution_limit: orchestration::SUBSTITUTION_LIMIT,
            retry: RetryPolicy::default(),
            scoring: ScoringConfig::default(),
            safety: SafetyConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `PANTRY_*` environment variables.
    ///
    /// Unparseable values fall back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_validated: env_or("PANTRY_MIN_VALIDATED", defaults.min_validated),
            arbiter_acceptance: env_or("PANTRY_ARBITER_ACCEPTANCE", defaults.arbiter_acceptance),
            request_budget_ms: env_or("PANTRY_REQUEST_BUDGET_MS", defaults.request_budget_ms),
            quota_per_request: env_or("PANTRY_QUOTA_PER_REQUEST", defaults.quota_per_request),
            discovery_limit: env_or("PANTRY_DISCOVERY_LIMIT", defaults.discovery_limit),
            generation_count: env_or("PANTRY_GENERATION_COUNT", defaults.generation_count),
            review_concurrency: env_or("PANTRY_REVIEW_CONCURRENCY", defaults.review_concurrency),
            substitution_limit: env_or("PANTRY_SUBSTITUTION_LIMIT", defaults.substitution_limit),
            retry: RetryPolicy {
                max_attempts: env_or("PANTRY_RETRY_MAX_ATTEMPTS", defaults.retry.max_attempts),
                initial_backoff_ms: env_or(
                    "PANTRY_RETRY_INITIAL_BACKOFF_MS",
                    defaults.retry.initial_backoff_ms,
                ),
                max_backoff_ms: env_or("PANTRY_RETRY_MAX_BACKOFF_MS", defaults.retry.max_backoff_ms),
                call_timeout_ms: env_or("PANTRY_CALL_TIMEOUT_MS", defaults.retry.call_timeout_ms),
            },
            scoring: defaults.scoring,
            safety: SafetyConfig {
                safe_word_window: env_or("PANTRY_SAFE_WORD_WINDOW", defaults.safety.safe_word_window),
            },
        }
    }

    /// Parse from JSON, filling omitted fields with defaults
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` on malformed JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_validated == 0 {
            return Err(ConfigError::ValueOutOfRange("min_validated must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.arbiter_acceptance) {
            return Err(ConfigError::InvalidRange("arbiter_acceptance must be within [0, 1]"));
        }
        if self.request_budget_ms == 0 {
            return Err(ConfigError::ValueOutOfRange("request_budget_ms must be positive"));
        }
        if self.discovery_limit == 0 {
            return Err(ConfigError::ValueOutOfRange("discovery_limit must be at least 1"));
        }
        if self.review_concurrency == 0 {
            return Err(ConfigError::ValueOutOfRange("review_concurrency must be at least 1"));
        }
        if self.substitution_limit == 0 {
            return Err(ConfigError::ValueOutOfRange("substitution_limit must be at least 1"));
        }
        self.retry.validate()?;
        self.scoring.validate()?;
        self.safety.validate()
    }

    /// Wall-clock budget as a duration
    #[must_use]
    pub const fn request_budget(&self) -> Duration {
        Duration::from_millis(self.request_budget_ms)
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
