// ABOUTME: Confidence tier ledger tracking each candidate's tier and provenance within a request
// ABOUTME: Enforces forward-only transitions: assignment once, RESCUE to UPGRADED, never downgrade
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use pantry_core::models::{ConfidenceTier, TierStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Illegal tier-ledger operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TierError {
    /// No record for the candidate
    #[error("candidate {0} was never ingested")]
    UnknownCandidate(String),

    /// Transition not allowed from the current status
    #[error("candidate {candidate_id}: cannot move from {from:?} to {to:?}")]
    IllegalTransition {
        /// Candidate
        candidate_id: String,
        /// Current status
        from: TierStatus,
        /// Requested status
        to: TierStatus,
    },
}

/// Kind of provenance event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvenanceKind {
    /// Candidate entered the request
    Ingested,
    /// First tier assignment
    Assigned,
    /// RESCUE promoted to UPGRADED
    Upgraded,
    /// Excluded from the result
    Rejected,
    /// Left untiered because the request finished without needing it
    SetAside,
}

/// One step in a candidate's tier history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceEvent {
    /// Pipeline stage that recorded the event
    pub stage: String,
    /// What happened
    pub kind: ProvenanceKind,
    /// Tier held after the event, if any
    pub tier: Option<ConfidenceTier>,
    /// Why it happened
    pub detail: String,
    /// When it happened
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct TierRecord {
    status: TierStatus,
    history: Vec<ProvenanceEvent>,
}

/// Per-request tier state for every candidate seen
#[derive(Debug, Clone, Default)]
pub struct TierLedger {
    records: HashMap<String, TierRecord>,
}

impl TierLedger {
    /// Empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a candidate entering the request. Returns `false` if it was already known.
    pub fn ingest(&mut self, candidate_id: &str, stage: &str, detail: impl Into<String>) -> bool {
        if self.records.contains_key(candidate_id) {
            return false;
        }
        self.records.insert(
            candidate_id.to_owned(),
            TierRecord {
                status: TierStatus::Ingested,
                history: vec![event(stage, ProvenanceKind::Ingested, None, detail.into())],
            },
        );
        true
    }

    /// First tier assignment. Only GOLDEN or RESCUE may be assigned, and only once.
    ///
    /// # Errors
    ///
    /// Returns an error when the candidate is unknown, already tiered or
    /// rejected, or the tier is UPGRADED (which only [`Self::upgrade`] grants)
    pub fn assign(
        &mut self,
        candidate_id: &str,
        tier: ConfidenceTier,
        stage: &str,
        detail: impl Into<String>,
    ) -> Result<(), TierError> {
        let record = self.record_mut(candidate_id)?;
        let to = TierStatus::Tiered(tier);
        if record.status != TierStatus::Ingested || tier == ConfidenceTier::Upgraded {
            return Err(illegal(candidate_id, record.status, to));
        }
        record.status = to;
        record
            .history
            .push(event(stage, ProvenanceKind::Assigned, Some(tier), detail.into()));
        debug!(candidate_id, tier = tier.as_str(), stage, "Tier assigned");
        Ok(())
    }

    /// Promote RESCUE to UPGRADED
    ///
    /// # Errors
    ///
    /// Returns an error unless the candidate currently holds RESCUE
    pub fn upgrade(
        &mut self,
        candidate_id: &str,
        stage: &str,
        detail: impl Into<String>,
    ) -> Result<(), TierError> {
        let record = self.record_mut(candidate_id)?;
        let to = TierStatus::Tiered(ConfidenceTier::Upgraded);
        if record.status != TierStatus::Tiered(ConfidenceTier::Rescue) {
            return Err(illegal(candidate_id, record.status, to));
        }
        record.status = to;
        record.history.push(event(
            stage,
            ProvenanceKind::Upgraded,
            Some(ConfidenceTier::Upgraded),
            detail.into(),
        ));
        debug!(candidate_id, stage, "Tier upgraded");
        Ok(())
    }

    /// Exclude an untiered candidate. Tiered candidates are never rejected.
    ///
    /// # Errors
    ///
    /// Returns an error when the candidate is unknown or already tiered
    pub fn reject(
        &mut self,
        candidate_id: &str,
        stage: &str,
        detail: impl Into<String>,
    ) -> Result<(), TierError> {
        let record = self.record_mut(candidate_id)?;
        match record.status {
            TierStatus::Rejected => Ok(()),
            TierStatus::Tiered(_) => Err(illegal(candidate_id, record.status, TierStatus::Rejected)),
            TierStatus::Ingested => {
                record.status = TierStatus::Rejected;
                record
                    .history
                    .push(event(stage, ProvenanceKind::Rejected, None, detail.into()));
                debug!(candidate_id, stage, "Candidate rejected");
                Ok(())
            }
        }
    }

    /// Note that an untiered candidate was not needed. Its status is unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error when the candidate is unknown or no longer untiered
    pub fn set_aside(
        &mut self,
        candidate_id: &str,
        stage: &str,
        detail: impl Into<String>,
    ) -> Result<(), TierError> {
        let record = self.record_mut(candidate_id)?;
        if record.status != TierStatus::Ingested {
            return Err(illegal(candidate_id, record.status, TierStatus::Ingested));
        }
        record
            .history
            .push(event(stage, ProvenanceKind::SetAside, None, detail.into()));
        debug!(candidate_id, stage, "Candidate set aside");
        Ok(())
    }

    /// Current status
    #[must_use]
    pub fn status(&self, candidate_id: &str) -> Option<TierStatus> {
        self.records.get(candidate_id).map(|r| r.status)
    }

    /// Current tier, if one is held
    #[must_use]
    pub fn tier(&self, candidate_id: &str) -> Option<ConfidenceTier> {
        self.status(candidate_id).and_then(|s| s.tier())
    }

    /// Provenance events in order
    #[must_use]
    pub fn history(&self, candidate_id: &str) -> &[ProvenanceEvent] {
        self.records
            .get(candidate_id)
            .map_or(&[], |r| r.history.as_slice())
    }

    /// Candidates holding `tier`
    #[must_use]
    pub fn count(&self, tier: ConfidenceTier) -> usize {
        self.records
            .values()
            .filter(|r| r.status == TierStatus::Tiered(tier))
            .count()
    }

    /// Candidates holding any tier
    #[must_use]
    pub fn validated_count(&self) -> usize {
        self.records
            .values()
            .filter(|r| r.status.tier().is_some())
            .count()
    }

    /// Candidates still waiting for a decision
    #[must_use]
    pub fn pending_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .records
            .iter()
            .filter(|(_, r)| r.status == TierStatus::Ingested)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Candidates holding any tier, with their tier
    #[must_use]
    pub fn tiered(&self) -> Vec<(String, ConfidenceTier)> {
        let mut tiered: Vec<(String, ConfidenceTier)> = self
            .records
            .iter()
            .filter_map(|(id, r)| r.status.tier().map(|t| (id.clone(), t)))
            .collect();
        tiered.sort_by(|a, b| a.0.cmp(&b.0));
        tiered
    }

    /// Number of candidates ever ingested
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing was ingested
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn record_mut(&mut self, candidate_id: &str) -> Result<&mut TierRecord, TierError> {
        self.records
            .get_mut(candidate_id)
            .ok_or_else(|| TierError::UnknownCandidate(candidate_id.to_owned()))
    }
}

fn event(
    stage: &str,
    kind: ProvenanceKind,
    tier: Option<ConfidenceTier>,
    detail: String,
) -> ProvenanceEvent {
    ProvenanceEvent {
        stage: stage.to_owned(),
        kind,
        tier,
        detail,
        at: Utc::now(),
    }
}

fn illegal(candidate_id: &str, from: TierStatus, to: TierStatus) -> TierError {
    TierError::IllegalTransition {
        candidate_id: candidate_id.to_owned(),
        from,
        to,
    }
}
