// ABOUTME: Safety verdicts produced by the dietary safety filter
// ABOUTME: PASS, REJECT, or provisional NEEDS_REVIEW with the triggering keyword
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// Outcome class of a safety check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SafetyVerdict {
    /// Safe for every requirement and intolerance
    Pass,
    /// Violates a hard rule
    Reject,
    /// Ambiguous; must be resolved by the arbiter before the candidate may be returned
    NeedsReview,
}

impl SafetyVerdict {
    const fn severity(self) -> u8 {
        match self {
            Self::Pass => 0,
            Self::NeedsReview => 1,
            Self::Reject => 2,
        }
    }

    /// The more severe of two verdicts
    #[must_use]
    pub const fn worst(self, other: Self) -> Self {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }

    /// String representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Reject => "REJECT",
            Self::NeedsReview => "NEEDS_REVIEW",
        }
    }
}

/// What caused a non-PASS verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyTrigger {
    /// Ingredient text that matched
    pub ingredient: String,
    /// Restricted keyword found in the ingredient
    pub keyword: String,
    /// Requirement or intolerance the keyword belongs to ("vegetarian", "dairy intolerance")
    pub rule: String,
    /// Qualifier that guarded the keyword, if any
    pub qualifier: Option<String>,
}

/// Verdict plus its explanation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyOutcome {
    /// Verdict class
    pub verdict: SafetyVerdict,
    /// Human-readable reason
    pub reason: Option<String>,
    /// Triggering ingredient and keyword
    pub trigger: Option<SafetyTrigger>,
}

impl SafetyOutcome {
    /// Clean pass
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            verdict: SafetyVerdict::Pass,
            reason: None,
            trigger: None,
        }
    }

    /// Hard rejection
    #[must_use]
    pub fn reject(reason: impl Into<String>, trigger: Option<SafetyTrigger>) -> Self {
        Self {
            verdict: SafetyVerdict::Reject,
            reason: Some(reason.into()),
            trigger,
        }
    }

    /// Provisional ambiguity awaiting arbiter review
    #[must_use]
    pub fn needs_review(reason: impl Into<String>, trigger: Option<SafetyTrigger>) -> Self {
        Self {
            verdict: SafetyVerdict::NeedsReview,
            reason: Some(reason.into()),
            trigger,
        }
    }

    /// Verdict is PASS
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self.verdict, SafetyVerdict::Pass)
    }

    /// Verdict is REJECT
    #[must_use]
    pub const fn is_reject(&self) -> bool {
        matches!(self.verdict, SafetyVerdict::Reject)
    }

    /// Verdict is NEEDS_REVIEW
    #[must_use]
    pub const fn requires_review(&self) -> bool {
        matches!(self.verdict, SafetyVerdict::NeedsReview)
    }

    /// Reason text, or the verdict name when none was recorded
    #[must_use]
    pub fn describe(&self) -> String {
        self.reason
            .clone()
            .unwrap_or_else(|| self.verdict.as_str().to_owned())
    }

    /// Express a non-PASS outcome in the engine error taxonomy
    #[must_use]
    pub fn to_error(&self, candidate_id: &str) -> Option<EngineError> {
        match self.verdict {
            SafetyVerdict::Pass => None,
            SafetyVerdict::Reject => Some(EngineError::ConstraintViolation {
                candidate_id: candidate_id.to_owned(),
                constraint: self
                    .trigger
                    .as_ref()
                    .map_or_else(|| "safety".to_owned(), |t| t.rule.clone()),
                keyword: self
                    .trigger
                    .as_ref()
                    .map_or_else(String::new, |t| t.keyword.clone()),
            }),
            SafetyVerdict::NeedsReview => Some(EngineError::AmbiguousSafety {
                candidate_id: candidate_id.to_owned(),
                reason: self.describe(),
            }),
        }
    }
}
