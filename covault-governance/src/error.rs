//! Error types for the covault governance engine.

use covault_types::{AccountId, Address, ProposalId};
use thiserror::Error;

/// Every failure path of the governance engine, exhaustively matched by
/// callers.
///
/// With one exception, an error means the operation left no trace:
/// validation, authorization, and state checks all run before any record
/// is touched. The exception is [`GovernanceError::ProposalExpired`],
/// which materializes the Expired status on the proposal it rejects —
/// that rejection mutates state by design.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GovernanceError {
    #[error("unrecognized governance model: {0}")]
    InvalidGovernanceModel(String),

    #[error("owner set must not be empty")]
    EmptyOwnerSet,

    #[error("duplicate owner address: {0}")]
    DuplicateOwner(Address),

    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("proposal {proposal_id} does not belong to account {account_id}")]
    ProposalAccountMismatch {
        proposal_id: ProposalId,
        account_id: AccountId,
    },

    #[error("{0} is not an owner of the account")]
    NotOwner(Address),

    #[error("{0} is not in the proposal's voter snapshot")]
    NotEligibleVoter(Address),

    #[error("{0} has already voted on this proposal")]
    AlreadyVoted(Address),

    #[error("proposal {0} is not active")]
    ProposalNotActive(ProposalId),

    #[error("proposal {0} has expired")]
    ProposalExpired(ProposalId),

    #[error("approval threshold not met: {approvals} of {required} required approvals")]
    ThresholdNotMet { approvals: u32, required: u32 },

    #[error("insufficient balance: have {balance}, need {requested}")]
    InsufficientBalance { balance: u64, requested: u64 },

    #[error("removing {0} would leave the account with no owners")]
    CannotRemoveLastOwner(Address),

    #[error("deposit of {amount} would overflow the account balance")]
    BalanceOverflow { amount: u64 },
}
