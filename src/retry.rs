// ABOUTME: Bounded retry with exponential backoff and per-attempt timeouts for collaborator calls
// ABOUTME: Threads the request quota budget through every attempt and hands it back to the caller
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::future::Future;
use std::time::Duration;

use pantry_core::errors::CollaboratorError;
use pantry_core::models::QuotaBudget;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, warn};

use crate::config::RetryPolicy;

/// Call a collaborator with bounded retries, never running past `deadline`.
///
/// Every attempt spends one unit of `budget`; once it is empty the call fails
/// with [`CollaboratorError::QuotaExhausted`] without touching the collaborator.
/// Attempts that exceed the policy timeout become [`CollaboratorError::Timeout`].
/// Only retryable failures are attempted again, after `initial * 2^(n-1)` ms.
///
/// Each attempt's timeout is capped at the time left before `deadline`. An
/// attempt cut short by the deadline, or a deadline that leaves no room for
/// the call or the next backoff, ends with
/// [`CollaboratorError::DeadlineExceeded`].
///
/// Returns the outcome together with the remaining budget.
pub async fn call_with_retry<T, F, Fut>(
    collaborator: &str,
    operation: &str,
    policy: &RetryPolicy,
    mut budget: QuotaBudget,
    deadline: Instant,
    mut call: F,
) -> (Result<T, CollaboratorError>, QuotaBudget)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CollaboratorError>>,
{
    let per_attempt = policy.call_timeout();
    let mut attempt: u32 = 0;

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            warn!(collaborator, operation, attempt, "Request deadline reached, skipping call");
            return (Err(deadline_exceeded(operation)), budget);
        }
        let Some(next) = budget.spend() else {
            warn!(collaborator, operation, "Collaborator quota exhausted");
            return (Err(CollaboratorError::QuotaExhausted), budget);
        };
        budget = next;
        attempt += 1;

        let limit = per_attempt.min(remaining);
        let outcome = match timeout(limit, call()).await {
            Ok(result) => result,
            Err(_) if limit < per_attempt => Err(deadline_exceeded(operation)),
            Err(_) => Err(CollaboratorError::Timeout {
                after_ms: policy.call_timeout_ms,
            }),
        };

        match outcome {
            Ok(value) => {
                debug!(collaborator, operation, attempt, "Collaborator call succeeded");
                return (Ok(value), budget);
            }
            Err(e) if e.is_retryable() && attempt < policy.max_attempts => {
                let backoff = policy.backoff(attempt);
                if Instant::now() + backoff >= deadline {
                    warn!(
                        collaborator,
                        operation,
                        attempt,
                        error = %e,
                        "Collaborator call failed with no time left to retry"
                    );
                    return (Err(e), budget);
                }
                let max_attempts = policy.max_attempts;
                warn!(
                    collaborator,
                    operation,
                    attempt,
                    max_attempts,
                    backoff_ms = millis(backoff),
                    error = %e,
                    "Collaborator call failed, retrying"
                );
                sleep(backoff).await;
            }
            Err(e) => {
                warn!(collaborator, operation, attempt, error = %e, "Collaborator call failed");
                return (Err(e), budget);
            }
        }
    }
}

fn deadline_exceeded(operation: &str) -> CollaboratorError {
    CollaboratorError::DeadlineExceeded {
        operation: operation.to_owned(),
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
