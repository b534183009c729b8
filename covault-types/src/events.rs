//! Structured notification events emitted by the governance engine.
//!
//! Exactly one event is emitted per state transition. The stream is
//! sufficient for an external observer to reconstruct the full history of
//! every account and proposal without any side channel.

use serde::{Deserialize, Serialize};

use crate::{AccountId, Action, Address, GovernanceModel, ProposalId, ProposalStatus};

/// One state transition in the governance engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernanceEvent {
    /// A new account was registered with a zero balance.
    AccountCreated {
        account_id: AccountId,
        owners: Vec<Address>,
        model: GovernanceModel,
    },
    /// The account balance was credited.
    DepositReceived {
        account_id: AccountId,
        amount: u64,
        new_balance: u64,
    },
    /// A proposal entered the Pending state with a frozen voter snapshot.
    ProposalCreated {
        account_id: AccountId,
        proposal_id: ProposalId,
        proposer: Address,
        action: Action,
        snapshot_owners: Vec<Address>,
        expires_at: Option<u64>,
    },
    /// A vote was accepted, with the tally after it was recorded.
    VoteCast {
        account_id: AccountId,
        proposal_id: ProposalId,
        voter: Address,
        approve: bool,
        approvals: u32,
        rejections: u32,
    },
    /// The proposal entered a terminal status.
    StatusChanged {
        account_id: AccountId,
        proposal_id: ProposalId,
        status: ProposalStatus,
    },
}
