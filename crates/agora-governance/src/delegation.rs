//! Single-hop vote delegation.
//!
//! A delegator lends their balance weight to exactly one delegate.
//! Resolution never chains: the delegate of a delegate is ignored, so a
//! cycle in the map is representable but has no effect on any tally.

use agora_ledger::BalanceLedger;
use agora_types::{Address, TokenAmount};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeSet, HashMap};

/// All current delegations: a flat delegator -> delegate map plus a reverse
/// index for weight aggregation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DelegationRegistry {
    /// delegator -> delegate
    delegations: HashMap<Address, Address>,
    /// delegate -> delegators, kept in sync with `delegations`
    delegators: HashMap<Address, BTreeSet<Address>>,
}

impl DelegationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point `delegator` at `delegate`, replacing any previous delegation.
    pub fn set(&mut self, delegator: Address, delegate: Address) {
        if let Some(previous) = self.delegations.insert(delegator, delegate) {
            if previous == delegate {
                return;
            }
            self.remove_reverse(&previous, &delegator);
        }
        self.delegators.entry(delegate).or_default().insert(delegator);
    }

    /// Remove `delegator`'s delegation. Returns the delegate it pointed at.
    pub fn clear(&mut self, delegator: &Address) -> Option<Address> {
        let delegate = self.delegations.remove(delegator)?;
        self.remove_reverse(&delegate, delegator);
        Some(delegate)
    }

    fn remove_reverse(&mut self, delegate: &Address, delegator: &Address) {
        if let Some(set) = self.delegators.get_mut(delegate) {
            set.remove(delegator);
            if set.is_empty() {
                self.delegators.remove(delegate);
            }
        }
    }

    /// Current delegate of an address.
    pub fn delegate_of(&self, delegator: &Address) -> Option<Address> {
        self.delegations.get(delegator).copied()
    }

    /// Whether the address currently has an outbound delegation.
    pub fn is_delegating(&self, delegator: &Address) -> bool {
        self.delegations.contains_key(delegator)
    }

    /// Addresses currently delegating to `delegate`, in address order.
    pub fn delegators_of(&self, delegate: &Address) -> impl Iterator<Item = &Address> {
        self.delegators.get(delegate).into_iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.delegations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegations.is_empty()
    }

    /// Own balance plus one hop of inbound delegated balances.
    ///
    /// Outbound delegation does not reduce this: a delegator's balance stays
    /// usable by them until their delegate actually casts a ballot.
    pub fn effective_weight(
        &self,
        address: &Address,
        ledger: &dyn BalanceLedger,
    ) -> TokenAmount {
        let own = ledger.balance_of(address);
        let delegated: TokenAmount = self
            .delegators_of(address)
            .map(|d| ledger.balance_of(d))
            .sum();
        own + delegated
    }
}

// Only the forward map is serialized; the reverse index is rebuilt on load.
impl Serialize for DelegationRegistry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.delegations.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DelegationRegistry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let delegations = HashMap::<Address, Address>::deserialize(deserializer)?;
        let mut registry = Self::default();
        for (delegator, delegate) in delegations {
            registry.set(delegator, delegate);
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_ledger::InMemoryLedger;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 20])
    }

    #[test]
    fn test_set_and_clear() {
        let mut registry = DelegationRegistry::new();
        registry.set(addr(1), addr(2));

        assert_eq!(registry.delegate_of(&addr(1)), Some(addr(2)));
        assert!(registry.is_delegating(&addr(1)));
        assert_eq!(registry.delegators_of(&addr(2)).count(), 1);

        assert_eq!(registry.clear(&addr(1)), Some(addr(2)));
        assert!(!registry.is_delegating(&addr(1)));
        assert_eq!(registry.delegators_of(&addr(2)).count(), 0);
        assert_eq!(registry.clear(&addr(1)), None);
    }

    #[test]
    fn test_overwrite_moves_reverse_index() {
        let mut registry = DelegationRegistry::new();
        registry.set(addr(1), addr(2));
        registry.set(addr(1), addr(3));

        assert_eq!(registry.delegate_of(&addr(1)), Some(addr(3)));
        assert_eq!(registry.delegators_of(&addr(2)).count(), 0);
        assert_eq!(registry.delegators_of(&addr(3)).count(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_redundant_set_is_noop() {
        let mut registry = DelegationRegistry::new();
        registry.set(addr(1), addr(2));
        registry.set(addr(1), addr(2));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.delegators_of(&addr(2)).count(), 1);
    }

    #[test]
    fn test_delegators_in_address_order() {
        let mut registry = DelegationRegistry::new();
        registry.set(addr(5), addr(9));
        registry.set(addr(1), addr(9));
        registry.set(addr(3), addr(9));

        let delegators: Vec<Address> = registry.delegators_of(&addr(9)).copied().collect();
        assert_eq!(delegators, vec![addr(1), addr(3), addr(5)]);
    }

    #[test]
    fn test_effective_weight_sums_one_hop() {
        let ledger = InMemoryLedger::with_balances([
            (addr(1), TokenAmount::from_whole(5_000)),
            (addr(2), TokenAmount::from_whole(3_000)),
            (addr(3), TokenAmount::from_whole(2_000)),
        ]);
        let mut registry = DelegationRegistry::new();

        // 2 -> 1 and 3 -> 2: resolution must not chain 3's weight to 1
        registry.set(addr(2), addr(1));
        registry.set(addr(3), addr(2));

        assert_eq!(
            registry.effective_weight(&addr(1), &ledger),
            TokenAmount::from_whole(8_000)
        );
        assert_eq!(
            registry.effective_weight(&addr(2), &ledger),
            TokenAmount::from_whole(5_000)
        );
        assert_eq!(
            registry.effective_weight(&addr(3), &ledger),
            TokenAmount::from_whole(2_000)
        );
    }

    #[test]
    fn test_cycle_is_harmless() {
        let ledger = InMemoryLedger::with_balances([
            (addr(1), TokenAmount::from_whole(10)),
            (addr(2), TokenAmount::from_whole(20)),
        ]);
        let mut registry = DelegationRegistry::new();
        registry.set(addr(1), addr(2));
        registry.set(addr(2), addr(1));

        assert_eq!(
            registry.effective_weight(&addr(1), &ledger),
            TokenAmount::from_whole(30)
        );
        assert_eq!(
            registry.effective_weight(&addr(2), &ledger),
            TokenAmount::from_whole(30)
        );
    }

    #[test]
    fn test_serde_rebuilds_reverse_index() {
        let mut registry = DelegationRegistry::new();
        registry.set(addr(1), addr(3));
        registry.set(addr(2), addr(3));

        let json = serde_json::to_string(&registry).unwrap();
        let restored: DelegationRegistry = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, registry);
        assert_eq!(restored.delegators_of(&addr(3)).count(), 2);
    }
}
