//! Agora Ledger - the token balance collaborator of the governance engine.
//!
//! The engine never owns token balances; it reads and moves them through the
//! [`BalanceLedger`] trait. [`InMemoryLedger`] is the in-process
//! implementation used for nodes without an external token backend and for
//! tests.

pub mod error;
pub mod memory;

pub use error::LedgerError;
pub use memory::InMemoryLedger;

use agora_types::{Address, TokenAmount};

/// Token balance store the governance engine runs against.
///
/// Implementations serialize their own mutations; `transfer` takes `&self`
/// so the engine can hold the ledger behind an `Arc` while mutating its own
/// state.
pub trait BalanceLedger: Send + Sync {
    /// Current balance of an account. Unknown accounts hold zero.
    fn balance_of(&self, account: &Address) -> TokenAmount;

    /// Move `amount` from one account to another. Fails without mutating
    /// anything when the source balance is short.
    fn transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), LedgerError>;
}
