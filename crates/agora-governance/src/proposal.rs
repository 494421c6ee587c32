//! Spending proposals and the per-proposal vote state.
//!
//! A proposal moves through: Voting -> Timelocked -> Passed -> Executed,
//! or Voting -> Rejected. Status is derived from the stored fields and the
//! caller-supplied clock; rejection is terminal without a flag.

use crate::error::GovernanceError;
use agora_types::{Address, Timestamp, TokenAmount};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Derived lifecycle position of a proposal at a given time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalStatus {
    /// Voting window is open
    Voting,
    /// Voting closed, majority reached, timelock still running
    Timelocked,
    /// Voting closed, majority reached, executable
    Passed,
    /// Voting closed without a majority (terminal)
    Rejected,
    /// Payout performed (terminal)
    Executed,
}

/// A single recorded vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub support: bool,
    /// Weight folded into the tally when the ballot was cast.
    pub weight: TokenAmount,
    pub cast_at: Timestamp,
}

/// A treasury spending proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    /// Unique proposal ID, dense from 0
    pub id: u64,
    /// Proposer address
    pub proposer: Address,
    /// Human-readable description
    pub description: String,
    /// Payout amount
    pub amount: TokenAmount,
    /// Payout recipient
    pub recipient: Address,
    /// Weighted yes tally
    pub yes_votes: TokenAmount,
    /// Weighted no tally
    pub no_votes: TokenAmount,
    /// Ballots by voter
    ballots: HashMap<Address, Ballot>,
    /// Addresses whose weight is already folded into a tally, either by
    /// voting directly or by being absorbed through their delegate
    counted: HashSet<Address>,
    /// Creation time
    pub created_at: Timestamp,
    /// End of the voting window; votes at exactly this instant still count
    pub voting_ends_at: Timestamp,
    /// Earliest execution time; defaults to the voting deadline
    pub timelock_ends_at: Timestamp,
    /// Replay guard
    pub executed: bool,
    /// Execution time
    pub executed_at: Option<Timestamp>,
}

impl Proposal {
    /// Create a new proposal with the voting window starting now.
    pub fn new(
        id: u64,
        proposer: Address,
        description: String,
        amount: TokenAmount,
        recipient: Address,
        now: Timestamp,
        voting_period_secs: Timestamp,
    ) -> Self {
        let voting_ends_at = now.saturating_add(voting_period_secs);
        Self {
            id,
            proposer,
            description,
            amount,
            recipient,
            yes_votes: TokenAmount::ZERO,
            no_votes: TokenAmount::ZERO,
            ballots: HashMap::new(),
            counted: HashSet::new(),
            created_at: now,
            voting_ends_at,
            timelock_ends_at: voting_ends_at,
            executed: false,
            executed_at: None,
        }
    }

    /// Check if the voting window is still open.
    pub fn voting_open(&self, now: Timestamp) -> bool {
        now <= self.voting_ends_at
    }

    /// Strict majority of weighted votes.
    pub fn passed(&self) -> bool {
        self.yes_votes > self.no_votes
    }

    /// Derive the lifecycle status at `now`. Challenge gating lives in the
    /// engine; a blocked proposal still reads as `Passed` here.
    pub fn status(&self, now: Timestamp) -> ProposalStatus {
        if self.executed {
            ProposalStatus::Executed
        } else if self.voting_open(now) {
            ProposalStatus::Voting
        } else if !self.passed() {
            ProposalStatus::Rejected
        } else if now < self.timelock_ends_at {
            ProposalStatus::Timelocked
        } else {
            ProposalStatus::Passed
        }
    }

    /// Check if the voter has a recorded ballot.
    pub fn has_voted(&self, voter: &Address) -> bool {
        self.ballots.contains_key(voter)
    }

    /// Check if an address's weight is already folded into a tally, whether
    /// by its own ballot or through its delegate's.
    pub fn weight_consumed(&self, address: &Address) -> bool {
        self.counted.contains(address)
    }

    /// Recorded ballot of a voter, if any.
    pub fn ballot(&self, voter: &Address) -> Option<&Ballot> {
        self.ballots.get(voter)
    }

    /// Voters with recorded ballots.
    pub fn voters(&self) -> impl Iterator<Item = &Address> {
        self.ballots.keys()
    }

    /// Number of addresses whose weight has been consumed.
    pub fn consumed_count(&self) -> usize {
        self.counted.len()
    }

    /// Record a ballot: fold `weight` into the chosen tally and mark the
    /// voter plus every absorbed delegator as consumed.
    pub fn record_ballot(
        &mut self,
        voter: Address,
        support: bool,
        weight: TokenAmount,
        absorbed: &[Address],
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        if !self.voting_open(now) {
            return Err(GovernanceError::VotingClosed);
        }

        if self.counted.contains(&voter) {
            return Err(GovernanceError::AlreadyVoted { proposal: self.id });
        }

        if weight.is_zero() {
            return Err(GovernanceError::InsufficientTokens {
                have: TokenAmount::ZERO,
                need: TokenAmount::from_base(1),
            });
        }

        if support {
            self.yes_votes += weight;
        } else {
            self.no_votes += weight;
        }

        self.ballots.insert(
            voter,
            Ballot {
                support,
                weight,
                cast_at: now,
            },
        );
        self.counted.insert(voter);
        self.counted.extend(absorbed.iter().copied());
        Ok(())
    }

    /// Mark as executed. The engine performs the payout first.
    pub(crate) fn mark_executed(&mut self, now: Timestamp) {
        self.executed = true;
        self.executed_at = Some(now);
    }
}

/// Ordered store of all proposals, keyed by a dense id starting at 0.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalStore {
    proposals: BTreeMap<u64, Proposal>,
    next_id: u64,
}

impl ProposalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a proposal and return its id.
    pub fn create(
        &mut self,
        proposer: Address,
        description: String,
        amount: TokenAmount,
        recipient: Address,
        now: Timestamp,
        voting_period_secs: Timestamp,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        let proposal = Proposal::new(
            id,
            proposer,
            description,
            amount,
            recipient,
            now,
            voting_period_secs,
        );
        self.proposals.insert(id, proposal);
        id
    }

    pub fn get(&self, id: u64) -> Option<&Proposal> {
        self.proposals.get(&id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Proposal> {
        self.proposals.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    /// All proposals in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.values()
    }

    /// Proposals in the given status at `now`, in id order.
    pub fn by_status(&self, status: ProposalStatus, now: Timestamp) -> Vec<&Proposal> {
        self.proposals
            .values()
            .filter(|p| p.status(now) == status)
            .collect()
    }
}
