//! Shared data types for the covault governed-custody ledger.
//!
//! Covault lets a group of parties jointly custody a fungible balance and
//! change group membership through threshold-gated proposals. This crate
//! holds the plain data carried between the governance engine and its
//! collaborators: identifiers, account and proposal records, and the
//! structured notification events.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod events;
pub mod governance;

pub use events::GovernanceEvent;
pub use governance::{
    Account, Action, ActionKind, GovernanceModel, Proposal, ProposalStatus,
};

/// Identifies a party: an account owner, a voter, or a transfer recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// Converts the address to a byte array.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Creates an address from a byte array.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Address(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Address(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Identifies a shared account. Assigned sequentially by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub u64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a proposal. Assigned sequentially by the proposal store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProposalId(pub u64);

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_displays_as_hex() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0xab;
        assert!(Address(bytes).to_string().starts_with("ab00"));
    }

    #[test]
    fn address_serde_round_trip() {
        let address = Address([7u8; 32]);
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(serde_json::from_str::<Address>(&json).unwrap(), address);
    }

    #[test]
    fn model_parses_known_names_only() {
        assert_eq!(
            GovernanceModel::from_name("plurality"),
            Some(GovernanceModel::Plurality)
        );
        assert_eq!(
            GovernanceModel::from_name("unanimity"),
            Some(GovernanceModel::Unanimity)
        );
        assert_eq!(GovernanceModel::from_name("supermajority"), None);
    }
}
