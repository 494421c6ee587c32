//! Snapshot persistence for governance state.
//!
//! A snapshot captures everything the engine owns: config, proposals,
//! delegations, challenges, and the event log. Ledger balances live outside
//! the engine and are not included.

use crate::challenge::ChallengeRegistry;
use crate::config::GovernanceConfig;
use crate::delegation::DelegationRegistry;
use crate::error::GovernanceError;
use crate::event::GovernanceEvent;
use crate::proposal::ProposalStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Serializable view of all engine-owned state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceSnapshot {
    pub config: GovernanceConfig,
    pub proposals: ProposalStore,
    pub delegations: DelegationRegistry,
    pub challenges: ChallengeRegistry,
    pub events: Vec<GovernanceEvent>,
}

impl GovernanceSnapshot {
    /// Write the snapshot to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), GovernanceError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| GovernanceError::Storage(e.to_string()))?;
        fs::write(path, json).map_err(|e| GovernanceError::Storage(e.to_string()))?;

        tracing::debug!("governance snapshot written to {:?}", path);
        Ok(())
    }

    /// Load a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self, GovernanceError> {
        let json =
            fs::read_to_string(path).map_err(|e| GovernanceError::Storage(e.to_string()))?;
        serde_json::from_str(&json).map_err(|e| GovernanceError::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GovernanceEngine;
    use agora_ledger::InMemoryLedger;
    use agora_types::{Address, TokenAmount};
    use std::sync::Arc;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 20])
    }

    fn populated_engine() -> GovernanceEngine {
        let ledger = Arc::new(InMemoryLedger::with_balances([
            (addr(1), TokenAmount::from_whole(5_000)),
            (addr(2), TokenAmount::from_whole(3_000)),
        ]));
        let config = GovernanceConfig {
            authority: addr(0xAA),
            treasury: addr(0xEE),
            ..Default::default()
        };
        let mut engine = GovernanceEngine::new(ledger, config);

        let id = engine
            .create_proposal(
                addr(1),
                0,
                "fund node operators".to_string(),
                TokenAmount::from_whole(100),
                addr(9),
            )
            .unwrap();
        engine.delegate(addr(2), addr(1)).unwrap();
        engine.vote(addr(1), 10, id, true).unwrap();
        engine
            .create_challenge(addr(2), 20, id, "needs review".to_string())
            .unwrap();
        engine
    }

    #[test]
    fn test_snapshot_roundtrip_through_file() {
        let engine = populated_engine();
        let snapshot = engine.snapshot();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("governance.json");
        snapshot.save(&path).unwrap();

        let loaded = GovernanceSnapshot::load(&path).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_restore_preserves_behavior() {
        let engine = populated_engine();
        let snapshot = engine.snapshot();

        let ledger = Arc::new(InMemoryLedger::with_balances([
            (addr(1), TokenAmount::from_whole(5_000)),
            (addr(2), TokenAmount::from_whole(3_000)),
        ]));
        let mut restored = GovernanceEngine::restore(ledger, snapshot);

        let proposal = restored.proposal(0).unwrap();
        assert_eq!(proposal.yes_votes, TokenAmount::from_whole(8_000));
        assert!(proposal.weight_consumed(&addr(2)));
        assert_eq!(restored.delegate_of(&addr(2)), Some(addr(1)));
        assert_eq!(restored.events().len(), 4);

        // Consumed-weight and challenge state survive the roundtrip
        assert!(restored.vote(addr(2), 30, 0, false).is_err());
        assert!(restored.challenge(0).unwrap().blocks_execution());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = GovernanceSnapshot::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, GovernanceError::Storage(_)));
    }

    #[test]
    fn test_load_garbage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();

        let err = GovernanceSnapshot::load(&path).unwrap_err();
        assert!(matches!(err, GovernanceError::Storage(_)));
    }
}
