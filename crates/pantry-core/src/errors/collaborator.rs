// ABOUTME: Error type returned by external discovery and arbiter collaborator calls
// ABOUTME: Classifies failures as retryable or terminal for the bounded retry helper
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

use super::EngineError;

/// Failure of a single collaborator call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CollaboratorError {
    /// The collaborator could not be reached or returned an error
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    /// The call did not complete within its timeout
    #[error("collaborator call timed out after {after_ms}ms")]
    Timeout {
        /// Timeout that elapsed
        after_ms: u64,
    },

    /// The response could not be validated against its schema
    #[error("malformed collaborator response: {0}")]
    Malformed(String),

    /// The request's call quota is spent
    #[error("collaborator quota exhausted")]
    QuotaExhausted,

    /// The request's wall-clock deadline left no time for the call
    #[error("request deadline reached before {operation} completed")]
    DeadlineExceeded {
        /// Operation that was cut short
        operation: String,
    },

    /// The collaborator does not offer this operation
    #[error("operation not supported: {0}")]
    Unsupported(String),
}

impl CollaboratorError {
    /// Only transient failures (unavailable, timed out) are retried
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout { .. })
    }

    /// Map into the engine taxonomy, naming the collaborator involved
    #[must_use]
    pub fn into_engine_error(self, collaborator: &str) -> EngineError {
        match self {
            Self::Malformed(reason) => EngineError::MalformedCollaboratorResponse {
                collaborator: collaborator.to_owned(),
                reason,
            },
            other => EngineError::CollaboratorUnavailable {
                collaborator: collaborator.to_owned(),
                reason: other.to_string(),
            },
        }
    }
}
