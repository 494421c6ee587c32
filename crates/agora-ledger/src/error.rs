use agora_types::TokenAmount;
use thiserror::Error;

/// Errors from ledger operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance {
        have: TokenAmount,
        need: TokenAmount,
    },
}
