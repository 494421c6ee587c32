//! Agora Governance - token-weighted proposal governance.
//!
//! This crate provides:
//! - Proposal lifecycle management (voting window, timelock, execution)
//! - Balance-weighted voting with single-hop delegation
//! - Challenge/dispute gating of execution
//! - Treasury payouts through a pluggable balance ledger
//! - Snapshot persistence and a thread-safe shared handle

pub mod challenge;
pub mod config;
pub mod delegation;
pub mod engine;
pub mod error;
pub mod event;
pub mod proposal;
pub mod shared;
pub mod snapshot;

pub use challenge::{Challenge, ChallengeRegistry};
pub use config::{GovernanceConfig, PROPOSAL_THRESHOLD, VOTING_PERIOD};
pub use delegation::DelegationRegistry;
pub use engine::GovernanceEngine;
pub use error::GovernanceError;
pub use event::GovernanceEvent;
pub use proposal::{Ballot, Proposal, ProposalStatus, ProposalStore};
pub use shared::SharedGovernance;
pub use snapshot::GovernanceSnapshot;
