//! Thread-safe shared handle over the governance engine.
//!
//! The engine itself is a single-writer state machine; this wrapper is its
//! serialization point. Every mutating call takes the write lock, so calls
//! apply atomically in some total order. Reads clone a consistent view under
//! the read lock.

use crate::challenge::Challenge;
use crate::config::GovernanceConfig;
use crate::engine::GovernanceEngine;
use crate::error::GovernanceError;
use crate::event::GovernanceEvent;
use crate::proposal::Proposal;
use crate::snapshot::GovernanceSnapshot;
use agora_types::{Address, Timestamp, TokenAmount};
use parking_lot::RwLock;
use std::sync::Arc;

/// Cloneable handle to one governance engine.
#[derive(Clone)]
pub struct SharedGovernance {
    inner: Arc<RwLock<GovernanceEngine>>,
}

impl SharedGovernance {
    pub fn new(engine: GovernanceEngine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    pub fn create_proposal(
        &self,
        caller: Address,
        now: Timestamp,
        description: String,
        amount: TokenAmount,
        recipient: Address,
    ) -> Result<u64, GovernanceError> {
        self.inner
            .write()
            .create_proposal(caller, now, description, amount, recipient)
    }

    pub fn vote(
        &self,
        caller: Address,
        now: Timestamp,
        proposal_id: u64,
        support: bool,
    ) -> Result<TokenAmount, GovernanceError> {
        self.inner.write().vote(caller, now, proposal_id, support)
    }

    pub fn delegate(&self, caller: Address, to: Address) -> Result<(), GovernanceError> {
        self.inner.write().delegate(caller, to)
    }

    pub fn set_timelock(
        &self,
        caller: Address,
        now: Timestamp,
        proposal_id: u64,
        duration_secs: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.inner
            .write()
            .set_timelock(caller, now, proposal_id, duration_secs)
    }

    pub fn execute_proposal(
        &self,
        caller: Address,
        now: Timestamp,
        proposal_id: u64,
    ) -> Result<(), GovernanceError> {
        self.inner.write().execute_proposal(caller, now, proposal_id)
    }

    pub fn create_challenge(
        &self,
        caller: Address,
        now: Timestamp,
        proposal_id: u64,
        description: String,
    ) -> Result<(), GovernanceError> {
        self.inner
            .write()
            .create_challenge(caller, now, proposal_id, description)
    }

    pub fn resolve_challenge(
        &self,
        caller: Address,
        now: Timestamp,
        proposal_id: u64,
        valid: bool,
    ) -> Result<(), GovernanceError> {
        self.inner
            .write()
            .resolve_challenge(caller, now, proposal_id, valid)
    }

    pub fn withdraw(&self, caller: Address, amount: TokenAmount) -> Result<(), GovernanceError> {
        self.inner.write().withdraw(caller, amount)
    }

    /// Cloned view of a proposal at a consistent point in time.
    pub fn proposal(&self, id: u64) -> Option<Proposal> {
        self.inner.read().proposal(id).cloned()
    }

    pub fn challenge(&self, proposal_id: u64) -> Option<Challenge> {
        self.inner.read().challenge(proposal_id).cloned()
    }

    pub fn config(&self) -> GovernanceConfig {
        self.inner.read().config().clone()
    }

    pub fn proposal_count(&self) -> usize {
        self.inner.read().proposal_count()
    }

    pub fn delegate_of(&self, delegator: &Address) -> Option<Address> {
        self.inner.read().delegate_of(delegator)
    }

    pub fn effective_weight(&self, address: &Address) -> TokenAmount {
        self.inner.read().effective_weight(address)
    }

    pub fn treasury_balance(&self) -> TokenAmount {
        self.inner.read().treasury_balance()
    }

    pub fn events(&self) -> Vec<GovernanceEvent> {
        self.inner.read().events().to_vec()
    }

    pub fn snapshot(&self) -> GovernanceSnapshot {
        self.inner.read().snapshot()
    }
}
