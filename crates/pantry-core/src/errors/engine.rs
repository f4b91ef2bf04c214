// ABOUTME: Engine error taxonomy for safety violations, ambiguity, and collaborator failures
// ABOUTME: Converts pipeline conditions into caller-facing AppError values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde_json::json;
use thiserror::Error;

use super::{AppError, ErrorCode};

/// Conditions raised while deciding on recipe candidates.
///
/// Only [`EngineError::InvalidConstraints`] ever aborts a request. Every other
/// variant is handled inside the pipeline and degrades the result set instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// A hard safety rule was violated; terminal for the candidate
    #[error("candidate {candidate_id} violates {constraint}: matched '{keyword}'")]
    ConstraintViolation {
        /// Offending candidate
        candidate_id: String,
        /// Requirement or intolerance that was violated
        constraint: String,
        /// Restricted keyword that matched
        keyword: String,
    },

    /// Safety could not be decided locally and awaits arbiter review
    #[error("candidate {candidate_id} needs review: {reason}")]
    AmbiguousSafety {
        /// Ambiguous candidate
        candidate_id: String,
        /// Why the decision was deferred
        reason: String,
    },

    /// A collaborator call failed or timed out after all retries
    #[error("{collaborator} unavailable: {reason}")]
    CollaboratorUnavailable {
        /// Collaborator name
        collaborator: String,
        /// Failure description
        reason: String,
    },

    /// A collaborator response failed schema validation
    #[error("malformed response from {collaborator}: {reason}")]
    MalformedCollaboratorResponse {
        /// Collaborator name
        collaborator: String,
        /// Validation failure
        reason: String,
    },

    /// The request constraints could not be parsed
    #[error("invalid constraints: {0}")]
    InvalidConstraints(String),
}

impl EngineError {
    /// Whether the pipeline can continue after this condition
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidConstraints(_))
    }
}

impl From<EngineError> for AppError {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::InvalidConstraints(_) => Self::invalid_input(message),
            EngineError::ConstraintViolation {
                candidate_id,
                constraint,
                keyword,
            } => Self::new(ErrorCode::InvalidInput, message).with_details(json!({
                "candidate_id": candidate_id,
                "constraint": constraint,
                "keyword": keyword,
            })),
            EngineError::AmbiguousSafety { candidate_id, .. } => {
                Self::new(ErrorCode::InvalidInput, message)
                    .with_details(json!({ "candidate_id": candidate_id }))
            }
            EngineError::CollaboratorUnavailable { collaborator, .. } => {
                Self::new(ErrorCode::ExternalServiceUnavailable, message)
                    .with_details(json!({ "collaborator": collaborator }))
            }
            EngineError::MalformedCollaboratorResponse { collaborator, .. } => {
                Self::new(ErrorCode::ExternalServiceError, message)
                    .with_details(json!({ "collaborator": collaborator }))
            }
        }
    }
}
