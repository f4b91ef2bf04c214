// ABOUTME: Explicit per-request collaborator call budget threaded through the orchestrator
// ABOUTME: Passed into and returned from every collaborator call instead of a shared counter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Remaining collaborator calls for one request.
///
/// The budget is a plain value: spending consumes it and yields the next
/// budget. Sub-budgets carved out with [`QuotaBudget::reserve`] are handed to
/// concurrent calls and folded back with [`QuotaBudget::merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaBudget {
    remaining: u32,
    spent: u32,
}

impl QuotaBudget {
    /// Fresh budget allowing `limit` calls
    #[must_use]
    pub const fn new(limit: u32) -> Self {
        Self {
            remaining: limit,
            spent: 0,
        }
    }

    /// Calls still allowed
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Calls already made
    #[must_use]
    pub const fn spent(&self) -> u32 {
        self.spent
    }

    /// No calls left
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Spend one call, or `None` when exhausted
    #[must_use]
    pub const fn spend(self) -> Option<Self> {
        if self.remaining == 0 {
            None
        } else {
            Some(Self {
                remaining: self.remaining - 1,
                spent: self.spent + 1,
            })
        }
    }

    /// Split off up to `units` calls. Returns `(reserved, rest)`.
    #[must_use]
    pub const fn reserve(self, units: u32) -> (Self, Self) {
        let granted = if units < self.remaining {
            units
        } else {
            self.remaining
        };
        (
            Self {
                remaining: granted,
                spent: 0,
            },
            Self {
                remaining: self.remaining - granted,
                spent: self.spent,
            },
        )
    }

    /// Fold a returned sub-budget back in
    #[must_use]
    pub const fn merge(self, returned: Self) -> Self {
        Self {
            remaining: self.remaining + returned.remaining,
            spent: self.spent + returned.spent,
        }
    }
}
