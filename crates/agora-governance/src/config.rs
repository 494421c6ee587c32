//! Governance policy configuration.

use agora_types::{days, Address, Timestamp, TokenAmount};
use serde::{Deserialize, Serialize};

/// Default voting window after proposal creation: 7 days.
pub const VOTING_PERIOD: Timestamp = days(7);

/// Default minimum effective weight required to create a proposal:
/// 5 000 whole tokens.
pub const PROPOSAL_THRESHOLD: TokenAmount = TokenAmount::from_whole(5_000);

/// Governance policy and wiring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Account allowed to set timelocks, resolve challenges, and withdraw
    /// from the treasury.
    pub authority: Address,
    /// Ledger account proposals are paid out of.
    pub treasury: Address,
    /// Voting window length in seconds.
    pub voting_period_secs: Timestamp,
    /// Minimum effective weight to create a proposal.
    pub proposal_threshold: TokenAmount,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            authority: Address::ZERO,
            treasury: Address::ZERO,
            voting_period_secs: VOTING_PERIOD,
            proposal_threshold: PROPOSAL_THRESHOLD,
        }
    }
}
