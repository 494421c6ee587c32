//! The governance engine: proposals, delegation, challenges, and treasury
//! payouts behind one `&mut self` state machine.
//!
//! Time never comes from a clock here; every deadline-sensitive operation
//! takes `now` from the host. All checks run before any mutation, so an
//! error always means nothing changed.

use crate::challenge::{Challenge, ChallengeRegistry};
use crate::config::GovernanceConfig;
use crate::delegation::DelegationRegistry;
use crate::error::GovernanceError;
use crate::event::GovernanceEvent;
use crate::proposal::{Proposal, ProposalStore};
use crate::snapshot::GovernanceSnapshot;
use agora_ledger::BalanceLedger;
use agora_types::{Address, Timestamp, TokenAmount};
use std::sync::Arc;
use tracing::info;

/// Token-weighted governance over an external balance ledger.
pub struct GovernanceEngine {
    config: GovernanceConfig,
    ledger: Arc<dyn BalanceLedger>,
    proposals: ProposalStore,
    delegations: DelegationRegistry,
    challenges: ChallengeRegistry,
    events: Vec<GovernanceEvent>,
}

impl GovernanceEngine {
    pub fn new(ledger: Arc<dyn BalanceLedger>, config: GovernanceConfig) -> Self {
        Self {
            config,
            ledger,
            proposals: ProposalStore::new(),
            delegations: DelegationRegistry::new(),
            challenges: ChallengeRegistry::new(),
            events: Vec::new(),
        }
    }

    /// Create a spending proposal. The caller's effective weight must meet
    /// the proposal threshold.
    pub fn create_proposal(
        &mut self,
        caller: Address,
        now: Timestamp,
        description: String,
        amount: TokenAmount,
        recipient: Address,
    ) -> Result<u64, GovernanceError> {
        let weight = self.delegations.effective_weight(&caller, self.ledger.as_ref());
        if weight < self.config.proposal_threshold {
            return Err(GovernanceError::InsufficientTokens {
                have: weight,
                need: self.config.proposal_threshold,
            });
        }

        let id = self.proposals.create(
            caller,
            description,
            amount,
            recipient,
            now,
            self.config.voting_period_secs,
        );
        let voting_ends_at = now.saturating_add(self.config.voting_period_secs);

        info!(id, proposer = %caller, amount = %amount, recipient = %recipient, "proposal created");
        self.events.push(GovernanceEvent::ProposalCreated {
            id,
            proposer: caller,
            amount,
            recipient,
            voting_ends_at,
        });
        Ok(id)
    }

    /// Cast a ballot. The recorded weight is the caller's balance plus the
    /// balances of their current delegators whose weight is not yet consumed
    /// on this proposal; those delegators are consumed by this ballot.
    ///
    /// Returns the recorded weight.
    pub fn vote(
        &mut self,
        caller: Address,
        now: Timestamp,
        proposal_id: u64,
        support: bool,
    ) -> Result<TokenAmount, GovernanceError> {
        let proposal = self
            .proposals
            .get_mut(proposal_id)
            .ok_or(GovernanceError::UnknownProposal(proposal_id))?;

        if !proposal.voting_open(now) {
            return Err(GovernanceError::VotingClosed);
        }
        if proposal.weight_consumed(&caller) {
            return Err(GovernanceError::AlreadyVoted {
                proposal: proposal_id,
            });
        }

        let mut weight = self.ledger.balance_of(&caller);
        let mut absorbed = Vec::new();
        for delegator in self.delegations.delegators_of(&caller) {
            if !proposal.weight_consumed(delegator) {
                weight += self.ledger.balance_of(delegator);
                absorbed.push(*delegator);
            }
        }

        proposal.record_ballot(caller, support, weight, &absorbed, now)?;

        info!(id = proposal_id, voter = %caller, support, weight = %weight, "vote cast");
        self.events.push(GovernanceEvent::VoteCast {
            id: proposal_id,
            voter: caller,
            support,
            weight,
        });
        Ok(weight)
    }

    /// Delegate the caller's balance weight to `to`, replacing any previous
    /// delegation. Delegating to yourself revokes an existing delegation;
    /// with nothing to revoke it fails with `SelfDelegation`.
    ///
    /// Only future ballots see the change. Tallies never move retroactively.
    pub fn delegate(&mut self, caller: Address, to: Address) -> Result<(), GovernanceError> {
        if to == caller {
            if self.delegations.clear(&caller).is_none() {
                return Err(GovernanceError::SelfDelegation);
            }
            info!(delegator = %caller, "delegation revoked");
            self.events.push(GovernanceEvent::DelegateSet {
                delegator: caller,
                delegate: None,
            });
            return Ok(());
        }

        self.delegations.set(caller, to);
        info!(delegator = %caller, delegate = %to, "delegate set");
        self.events.push(GovernanceEvent::DelegateSet {
            delegator: caller,
            delegate: Some(to),
        });
        Ok(())
    }

    /// Move a proposal's earliest execution time to `now + duration_secs`.
    /// Authority only.
    pub fn set_timelock(
        &mut self,
        caller: Address,
        now: Timestamp,
        proposal_id: u64,
        duration_secs: Timestamp,
    ) -> Result<(), GovernanceError> {
        if caller != self.config.authority {
            return Err(GovernanceError::Unauthorized(
                "only the authority may set timelocks".to_string(),
            ));
        }

        let proposal = self
            .proposals
            .get_mut(proposal_id)
            .ok_or(GovernanceError::UnknownProposal(proposal_id))?;

        if proposal.executed {
            return Err(GovernanceError::ProposalFinalized);
        }

        // Clamps at the end of time rather than wrapping
        let unlocks_at = now.saturating_add(duration_secs);
        proposal.timelock_ends_at = unlocks_at;

        info!(id = proposal_id, unlocks_at, "timelock set");
        self.events.push(GovernanceEvent::TimelockSet {
            id: proposal_id,
            unlocks_at,
        });
        Ok(())
    }

    /// Execute a passed proposal: pay `amount` from the treasury to the
    /// recipient and mark the proposal executed. Any caller may execute.
    pub fn execute_proposal(
        &mut self,
        caller: Address,
        now: Timestamp,
        proposal_id: u64,
    ) -> Result<(), GovernanceError> {
        let proposal = self
            .proposals
            .get_mut(proposal_id)
            .ok_or(GovernanceError::UnknownProposal(proposal_id))?;

        if proposal.executed {
            return Err(GovernanceError::AlreadyExecuted);
        }
        if now < proposal.timelock_ends_at {
            return Err(GovernanceError::TimelockActive {
                unlocks_at: proposal.timelock_ends_at,
            });
        }
        if proposal.voting_open(now) {
            return Err(GovernanceError::VotingStillOpen);
        }
        if !proposal.passed() {
            return Err(GovernanceError::ProposalRejected);
        }
        if self.challenges.blocks_execution(proposal_id) {
            return Err(GovernanceError::ChallengeBlocking);
        }

        let amount = proposal.amount;
        let recipient = proposal.recipient;

        // Payout first; a failed transfer leaves the proposal executable
        self.ledger.transfer(&self.config.treasury, &recipient, amount)?;
        proposal.mark_executed(now);

        info!(id = proposal_id, executor = %caller, recipient = %recipient, amount = %amount, "proposal executed");
        self.events.push(GovernanceEvent::ProposalExecuted {
            id: proposal_id,
            recipient,
            amount,
        });
        Ok(())
    }

    /// Raise a dispute against an unexecuted proposal. One challenge per
    /// proposal; any address may challenge.
    pub fn create_challenge(
        &mut self,
        caller: Address,
        now: Timestamp,
        proposal_id: u64,
        description: String,
    ) -> Result<(), GovernanceError> {
        let proposal = self
            .proposals
            .get(proposal_id)
            .ok_or(GovernanceError::UnknownProposal(proposal_id))?;

        if proposal.executed {
            return Err(GovernanceError::ProposalFinalized);
        }

        self.challenges.open(proposal_id, caller, description, now)?;

        info!(id = proposal_id, challenger = %caller, "challenge opened");
        self.events.push(GovernanceEvent::ChallengeOpened {
            id: proposal_id,
            challenger: caller,
        });
        Ok(())
    }

    /// Rule on a proposal's challenge. Authority only.
    pub fn resolve_challenge(
        &mut self,
        caller: Address,
        now: Timestamp,
        proposal_id: u64,
        valid: bool,
    ) -> Result<(), GovernanceError> {
        if caller != self.config.authority {
            return Err(GovernanceError::Unauthorized(
                "only the authority may resolve challenges".to_string(),
            ));
        }

        self.challenges.resolve(proposal_id, valid, now)?;

        info!(id = proposal_id, valid, "challenge resolved");
        self.events.push(GovernanceEvent::ChallengeResolved {
            id: proposal_id,
            valid,
        });
        Ok(())
    }

    /// Move funds from the treasury to the authority. Authority only.
    pub fn withdraw(
        &mut self,
        caller: Address,
        amount: TokenAmount,
    ) -> Result<(), GovernanceError> {
        if caller != self.config.authority {
            return Err(GovernanceError::Unauthorized(
                "only the authority may withdraw from the treasury".to_string(),
            ));
        }

        let have = self.ledger.balance_of(&self.config.treasury);
        if have < amount {
            return Err(GovernanceError::InsufficientBalance { have, need: amount });
        }

        self.ledger
            .transfer(&self.config.treasury, &self.config.authority, amount)?;

        info!(to = %self.config.authority, amount = %amount, "treasury withdrawal");
        self.events.push(GovernanceEvent::TreasuryWithdrawal {
            to: self.config.authority,
            amount,
        });
        Ok(())
    }

    pub fn config(&self) -> &GovernanceConfig {
        &self.config
    }

    pub fn proposal(&self, id: u64) -> Option<&Proposal> {
        self.proposals.get(id)
    }

    /// All proposals in id order.
    pub fn proposals(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.iter()
    }

    pub fn proposal_count(&self) -> usize {
        self.proposals.len()
    }

    pub fn challenge(&self, proposal_id: u64) -> Option<&Challenge> {
        self.challenges.get(proposal_id)
    }

    pub fn delegate_of(&self, delegator: &Address) -> Option<Address> {
        self.delegations.delegate_of(delegator)
    }

    /// Own balance plus one hop of inbound delegated balances.
    pub fn effective_weight(&self, address: &Address) -> TokenAmount {
        self.delegations
            .effective_weight(address, self.ledger.as_ref())
    }

    pub fn treasury_balance(&self) -> TokenAmount {
        self.ledger.balance_of(&self.config.treasury)
    }

    /// Audit trail of every successful mutation, in order.
    pub fn events(&self) -> &[GovernanceEvent] {
        &self.events
    }

    /// Capture all governance state (ledger balances are external).
    pub fn snapshot(&self) -> GovernanceSnapshot {
        GovernanceSnapshot {
            config: self.config.clone(),
            proposals: self.proposals.clone(),
            delegations: self.delegations.clone(),
            challenges: self.challenges.clone(),
            events: self.events.clone(),
        }
    }

    /// Rebuild an engine from a snapshot and the ledger it runs against.
    pub fn restore(ledger: Arc<dyn BalanceLedger>, snapshot: GovernanceSnapshot) -> Self {
        Self {
            config: snapshot.config,
            ledger,
            proposals: snapshot.proposals,
            delegations: snapshot.delegations,
            challenges: snapshot.challenges,
            events: snapshot.events,
        }
    }
}
