//! Audit events appended on every successful state mutation.

use agora_types::{Address, Timestamp, TokenAmount};
use serde::{Deserialize, Serialize};

/// A governance state change. The engine keeps these in order as its audit
/// trail and serializes them into snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernanceEvent {
    ProposalCreated {
        id: u64,
        proposer: Address,
        amount: TokenAmount,
        recipient: Address,
        voting_ends_at: Timestamp,
    },
    VoteCast {
        id: u64,
        voter: Address,
        support: bool,
        weight: TokenAmount,
    },
    DelegateSet {
        delegator: Address,
        /// `None` means the delegation was revoked.
        delegate: Option<Address>,
    },
    TimelockSet {
        id: u64,
        unlocks_at: Timestamp,
    },
    ProposalExecuted {
        id: u64,
        recipient: Address,
        amount: TokenAmount,
    },
    ChallengeOpened {
        id: u64,
        challenger: Address,
    },
    ChallengeResolved {
        id: u64,
        valid: bool,
    },
    TreasuryWithdrawal {
        to: Address,
        amount: TokenAmount,
    },
}

impl GovernanceEvent {
    /// Proposal this event concerns, when it concerns one.
    pub fn proposal_id(&self) -> Option<u64> {
        match self {
            GovernanceEvent::ProposalCreated { id, .. }
            | GovernanceEvent::VoteCast { id, .. }
            | GovernanceEvent::TimelockSet { id, .. }
            | GovernanceEvent::ProposalExecuted { id, .. }
            | GovernanceEvent::ChallengeOpened { id, .. }
            | GovernanceEvent::ChallengeResolved { id, .. } => Some(*id),
            GovernanceEvent::DelegateSet { .. }
            | GovernanceEvent::TreasuryWithdrawal { .. } => None,
        }
    }
}
