//! Covault Governance Engine
//!
//! This crate implements the governance protocol for covault's jointly
//! custodied accounts: the account registry, the proposal state machine
//! with its frozen voter snapshots, threshold evaluation under the
//! Plurality and Unanimity models, and the action executor that mutates
//! an account once a proposal passes.
//!
//! Every operation is a bounded, synchronous computation applied
//! atomically against the records it touches; time is always supplied by
//! the caller as an explicit `now` value. Serialization of conflicting
//! concurrent operations is the hosting substrate's responsibility.

pub mod account_registry;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod executor;
pub mod proposals;
pub mod threshold;

pub use account_registry::AccountRegistry;
pub use coordinator::{GovernanceCoordinator, GovernanceStats};
pub use error::GovernanceError;
pub use events::{EventLog, EventSink, NullSink};
pub use executor::{execute_proposal, LoggingTransfer, ValueTransfer};
pub use proposals::ProposalStore;

// Re-export commonly used types
pub use covault_types::{
    Account, AccountId, Action, ActionKind, Address, GovernanceEvent, GovernanceModel, Proposal,
    ProposalId, ProposalStatus,
};
