//! Challenge/dispute gating of proposal execution.
//!
//! Any address may raise at most one challenge against a proposal. An open
//! challenge suspends execution until the authority resolves it: resolved
//! invalid lifts the block, resolved valid bars execution for good.

use crate::error::GovernanceError;
use agora_types::{Address, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A dispute raised against a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// Proposal under dispute
    pub proposal_id: u64,
    /// Who raised it
    pub challenger: Address,
    /// Grounds for the dispute
    pub description: String,
    /// When it was opened
    pub opened_at: Timestamp,
    /// Whether the authority has ruled
    pub resolved: bool,
    /// Authority's ruling; meaningful only once resolved
    pub valid: bool,
    /// When the ruling happened
    pub resolved_at: Option<Timestamp>,
}

impl Challenge {
    fn new(proposal_id: u64, challenger: Address, description: String, now: Timestamp) -> Self {
        Self {
            proposal_id,
            challenger,
            description,
            opened_at: now,
            resolved: false,
            valid: false,
            resolved_at: None,
        }
    }

    /// Whether this challenge currently suspends execution.
    pub fn blocks_execution(&self) -> bool {
        !self.resolved || self.valid
    }
}

/// At most one challenge per proposal, keyed by proposal id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChallengeRegistry {
    challenges: BTreeMap<u64, Challenge>,
}

impl ChallengeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a challenge against a proposal.
    pub fn open(
        &mut self,
        proposal_id: u64,
        challenger: Address,
        description: String,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        if self.challenges.contains_key(&proposal_id) {
            return Err(GovernanceError::ChallengeExists(proposal_id));
        }
        self.challenges.insert(
            proposal_id,
            Challenge::new(proposal_id, challenger, description, now),
        );
        Ok(())
    }

    /// Record the authority's ruling on a proposal's challenge.
    pub fn resolve(
        &mut self,
        proposal_id: u64,
        valid: bool,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        let challenge = self
            .challenges
            .get_mut(&proposal_id)
            .ok_or(GovernanceError::UnknownChallenge(proposal_id))?;

        if challenge.resolved {
            return Err(GovernanceError::ChallengeAlreadyResolved(proposal_id));
        }

        challenge.resolved = true;
        challenge.valid = valid;
        challenge.resolved_at = Some(now);
        Ok(())
    }

    pub fn get(&self, proposal_id: u64) -> Option<&Challenge> {
        self.challenges.get(&proposal_id)
    }

    /// Whether execution of the proposal is currently suspended.
    pub fn blocks_execution(&self, proposal_id: u64) -> bool {
        self.challenges
            .get(&proposal_id)
            .map(Challenge::blocks_execution)
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    /// All challenges in proposal-id order.
    pub fn iter(&self) -> impl Iterator<Item = &Challenge> {
        self.challenges.values()
    }
}
