use agora_ledger::LedgerError;
use agora_types::{Timestamp, TokenAmount};
use thiserror::Error;

/// Errors that can occur in governance operations.
///
/// Every operation runs all of its checks before touching any state, so a
/// returned error means nothing was mutated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GovernanceError {
    #[error("Insufficient tokens: have {have}, need {need}")]
    InsufficientTokens {
        have: TokenAmount,
        need: TokenAmount,
    },

    #[error("Proposal not found: {0}")]
    UnknownProposal(u64),

    #[error("Already voted on proposal {proposal}")]
    AlreadyVoted { proposal: u64 },

    #[error("Voting period has expired")]
    VotingClosed,

    #[error("Voting period is still open")]
    VotingStillOpen,

    #[error("Proposal already executed")]
    AlreadyExecuted,

    #[error("Proposal is still under timelock until {unlocks_at}")]
    TimelockActive { unlocks_at: Timestamp },

    #[error("The proposal did not pass")]
    ProposalRejected,

    #[error("Execution blocked by challenge")]
    ChallengeBlocking,

    #[error("Proposal already finalized")]
    ProposalFinalized,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Self-delegation not allowed")]
    SelfDelegation,

    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance {
        have: TokenAmount,
        need: TokenAmount,
    },

    #[error("No challenge found for proposal {0}")]
    UnknownChallenge(u64),

    #[error("Proposal {0} already has a challenge")]
    ChallengeExists(u64),

    #[error("Challenge for proposal {0} already resolved")]
    ChallengeAlreadyResolved(u64),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<LedgerError> for GovernanceError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::InsufficientBalance { have, need } => {
                GovernanceError::InsufficientBalance { have, need }
            }
        }
    }
}
