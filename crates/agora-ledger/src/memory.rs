//! In-memory balance ledger backed by a `RwLock`ed account map.

use crate::{BalanceLedger, LedgerError};
use agora_types::{Address, TokenAmount};
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory token ledger. Mutations go through the write lock, so transfers
/// are serialized; reads see a consistent map.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: RwLock<HashMap<Address, TokenAmount>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger pre-funded with the given genesis balances.
    pub fn with_balances<I>(balances: I) -> Self
    where
        I: IntoIterator<Item = (Address, TokenAmount)>,
    {
        Self {
            balances: RwLock::new(balances.into_iter().collect()),
        }
    }

    /// Credit an account out of thin air. Genesis and test wiring only.
    pub fn mint(&self, account: &Address, amount: TokenAmount) {
        let mut balances = self.balances.write();
        let balance = balances.entry(*account).or_insert(TokenAmount::ZERO);
        *balance += amount;
        tracing::debug!(account = %account, amount = %amount, "minted");
    }

    /// Sum of all account balances.
    pub fn total_supply(&self) -> TokenAmount {
        self.balances.read().values().copied().sum()
    }
}

impl BalanceLedger for InMemoryLedger {
    fn balance_of(&self, account: &Address) -> TokenAmount {
        self.balances
            .read()
            .get(account)
            .copied()
            .unwrap_or(TokenAmount::ZERO)
    }

    fn transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), LedgerError> {
        let mut balances = self.balances.write();

        let from_balance = balances.get(from).copied().unwrap_or(TokenAmount::ZERO);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                have: from_balance,
                need: amount,
            });
        }

        balances.insert(*from, from_balance - amount);
        let to_balance = balances.get(to).copied().unwrap_or(TokenAmount::ZERO);
        balances.insert(*to, to_balance + amount);

        tracing::debug!(from = %from, to = %to, amount = %amount, "transfer");
        Ok(())
    }
}
