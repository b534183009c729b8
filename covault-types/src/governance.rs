//! Data structures for covault's threshold governance.

use serde::{Deserialize, Serialize};

use crate::{AccountId, Address, ProposalId};

/// Rule determining how many approvals, relative to the voter snapshot,
/// are required to pass a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GovernanceModel {
    /// More than half of the snapshot must approve.
    Plurality,
    /// Every member of the snapshot must approve.
    Unanimity,
}

impl GovernanceModel {
    /// Parses a caller-supplied model name. Returns `None` for anything
    /// other than the two recognized models.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "plurality" => Some(GovernanceModel::Plurality),
            "unanimity" => Some(GovernanceModel::Unanimity),
            _ => None,
        }
    }

    /// The canonical name accepted by [`GovernanceModel::from_name`].
    pub fn name(&self) -> &'static str {
        match self {
            GovernanceModel::Plurality => "plurality",
            GovernanceModel::Unanimity => "unanimity",
        }
    }
}

/// Enumerates the kinds of effect a passed proposal applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Move `amount` from the account balance to the target address.
    Transfer,
    /// Add the target address to the owner set.
    AddOwner,
    /// Remove the target address from the owner set.
    RemoveOwner,
}

/// The effect a proposal applies to its account on successful execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    /// Transfer recipient, or the owner being added/removed.
    pub target: Address,
    /// Transfer amount. Unused by owner-set actions.
    pub amount: u64,
}

impl Action {
    pub fn transfer(target: Address, amount: u64) -> Self {
        Action {
            kind: ActionKind::Transfer,
            target,
            amount,
        }
    }

    pub fn add_owner(target: Address) -> Self {
        Action {
            kind: ActionKind::AddOwner,
            target,
            amount: 0,
        }
    }

    pub fn remove_owner(target: Address) -> Self {
        Action {
            kind: ActionKind::RemoveOwner,
            target,
            amount: 0,
        }
    }
}

/// Lifecycle state of a proposal. `Pending` is the initial state; the
/// other three are terminal and never change once entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalStatus {
    Pending,
    Executed,
    Rejected,
    Expired,
}

impl ProposalStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProposalStatus::Pending)
    }
}

/// A jointly custodied account: an owner set, a fungible balance, and the
/// governance model its proposals are evaluated under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    /// Current owner set, in insertion order. Non-empty and
    /// duplicate-free at all times; mutated only by executed
    /// AddOwner/RemoveOwner actions.
    pub owners: Vec<Address>,
    /// Fungible balance. Credited by permissionless deposits, debited by
    /// executed Transfer actions.
    pub balance: u64,
    pub model: GovernanceModel,
}

impl Account {
    pub fn is_owner(&self, address: &Address) -> bool {
        self.owners.contains(address)
    }

    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }
}

/// A threshold-gated proposal against a single account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    /// The account this proposal mutates on execution.
    pub account_id: AccountId,
    pub proposer: Address,
    pub action: Action,
    /// The account's owner set frozen at creation time. Eligibility and
    /// thresholds are evaluated against this snapshot and never
    /// re-derived from the live account, so concurrent membership
    /// changes cannot disturb an in-flight vote.
    pub snapshot_owners: Vec<Address>,
    /// Addresses that have cast a vote, in voting order. Always a subset
    /// of `snapshot_owners`.
    pub voters: Vec<Address>,
    pub approvals: u32,
    pub rejections: u32,
    pub status: ProposalStatus,
    pub created_at: u64,
    /// Optional absolute expiry timestamp. Expiry is detected lazily, on
    /// the first vote or execution attempt past the deadline.
    pub expires_at: Option<u64>,
}

impl Proposal {
    /// Size of the frozen voter snapshot.
    pub fn snapshot_size(&self) -> u32 {
        self.snapshot_owners.len() as u32
    }

    /// Whether `voter` was an owner when this proposal was created.
    pub fn is_eligible(&self, voter: &Address) -> bool {
        self.snapshot_owners.contains(voter)
    }

    pub fn has_voted(&self, voter: &Address) -> bool {
        self.voters.contains(voter)
    }

    /// Total votes recorded so far.
    pub fn votes_cast(&self) -> u32 {
        self.approvals + self.rejections
    }

    /// Whether the deadline has passed at `now`. A proposal with no
    /// expiry never expires.
    pub fn is_expired_at(&self, now: u64) -> bool {
        matches!(self.expires_at, Some(expiry) if now > expiry)
    }
}
