// ABOUTME: Discrete confidence tiers and per-candidate tier status
// ABOUTME: Ordered GOLDEN > UPGRADED > RESCUE, independent of the continuous fit score
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use crate::constants::tiers;

/// Confidence tier. Variant order is rank order, so `Ord` sorts RESCUE lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceTier {
    /// Passed safety but failed a semantic tag
    Rescue,
    /// Rescue candidate confirmed by the arbiter
    Upgraded,
    /// Passed every declared constraint
    Golden,
}

impl ConfidenceTier {
    /// Numeric confidence value
    #[must_use]
    pub const fn value(&self) -> f64 {
        match self {
            Self::Golden => tiers::GOLDEN,
            Self::Upgraded => tiers::UPGRADED,
            Self::Rescue => tiers::RESCUE,
        }
    }

    /// String representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Golden => "GOLDEN",
            Self::Upgraded => "UPGRADED",
            Self::Rescue => "RESCUE",
        }
    }
}

/// Lifecycle position of one candidate within a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "tier", rename_all = "snake_case")]
pub enum TierStatus {
    /// Seen but not yet tiered
    Ingested,
    /// Holds a tier
    Tiered(ConfidenceTier),
    /// Excluded from the result
    Rejected,
}

impl TierStatus {
    /// Tier, if one is held
    #[must_use]
    pub const fn tier(&self) -> Option<ConfidenceTier> {
        match self {
            Self::Tiered(tier) => Some(*tier),
            Self::Ingested | Self::Rejected => None,
        }
    }
}
