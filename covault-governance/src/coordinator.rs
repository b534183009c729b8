//! Unified facade over the account registry, proposal store, and action
//! executor.
//!
//! The coordinator owns every governance record plus the two collaborator
//! seams (event sink, transfer backend) and exposes the five operations
//! and the read-only query surface consumed by the presentation layer.

use covault_types::{
    Account, AccountId, Action, Address, GovernanceModel, Proposal, ProposalId, ProposalStatus,
};
use serde::Serialize;

use crate::account_registry::AccountRegistry;
use crate::error::GovernanceError;
use crate::events::{EventSink, NullSink};
use crate::executor::{self, LoggingTransfer, ValueTransfer};
use crate::proposals::ProposalStore;
use crate::threshold;

/// Owns the governance stores and collaborators.
pub struct GovernanceCoordinator {
    registry: AccountRegistry,
    proposals: ProposalStore,
    events: Box<dyn EventSink>,
    transfers: Box<dyn ValueTransfer>,
}

impl GovernanceCoordinator {
    /// Coordinator with a discarding event sink and a logging transfer
    /// backend.
    pub fn new() -> Self {
        Self::with_collaborators(Box::new(NullSink), Box::new(LoggingTransfer))
    }

    /// Coordinator wired to a caller-supplied notification sink and
    /// settlement backend.
    pub fn with_collaborators(
        events: Box<dyn EventSink>,
        transfers: Box<dyn ValueTransfer>,
    ) -> Self {
        Self {
            registry: AccountRegistry::new(),
            proposals: ProposalStore::new(),
            events,
            transfers,
        }
    }

    /// Registers a new account. See [`AccountRegistry::create_account`].
    pub fn create_account(
        &mut self,
        owners: Vec<Address>,
        model: &str,
    ) -> Result<AccountId, GovernanceError> {
        self.registry
            .create_account(owners, model, self.events.as_mut())
    }

    /// Credits the account balance. Permissionless.
    pub fn deposit(&mut self, account_id: AccountId, amount: u64) -> Result<u64, GovernanceError> {
        self.registry.deposit(account_id, amount, self.events.as_mut())
    }

    /// Creates a proposal against the account, snapshotting its current
    /// owners. The proposer must be a current owner.
    pub fn create_proposal(
        &mut self,
        account_id: AccountId,
        proposer: Address,
        action: Action,
        now: u64,
        expires_at: Option<u64>,
    ) -> Result<ProposalId, GovernanceError> {
        let account = self
            .registry
            .get_account(&account_id)
            .ok_or(GovernanceError::AccountNotFound(account_id))?;
        self.proposals.create_proposal(
            account,
            proposer,
            action,
            now,
            expires_at,
            self.events.as_mut(),
        )
    }

    /// Casts a vote on the proposal. See [`ProposalStore::vote`].
    pub fn vote(
        &mut self,
        account_id: AccountId,
        proposal_id: ProposalId,
        voter: Address,
        approve: bool,
        now: u64,
    ) -> Result<(), GovernanceError> {
        let proposal = self
            .proposals
            .get_proposal(&proposal_id)
            .ok_or(GovernanceError::ProposalNotFound(proposal_id))?;
        if proposal.account_id != account_id {
            return Err(GovernanceError::ProposalAccountMismatch {
                proposal_id,
                account_id,
            });
        }
        let model = self.registry.model(&account_id)?;
        self.proposals.vote(
            model,
            proposal_id,
            voter,
            approve,
            now,
            self.events.as_mut(),
        )
    }

    /// Executes a passed proposal. See [`executor::execute_proposal`].
    pub fn execute_proposal(
        &mut self,
        account_id: AccountId,
        proposal_id: ProposalId,
        now: u64,
    ) -> Result<(), GovernanceError> {
        executor::execute_proposal(
            &mut self.registry,
            &mut self.proposals,
            self.transfers.as_mut(),
            self.events.as_mut(),
            account_id,
            proposal_id,
            now,
        )
    }

    // --- Query surface (pure, no side effects) ---

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.registry.get_account(&id)
    }

    pub fn owners(&self, id: AccountId) -> Result<&[Address], GovernanceError> {
        self.registry.owners(&id)
    }

    pub fn balance(&self, id: AccountId) -> Result<u64, GovernanceError> {
        self.registry.balance(&id)
    }

    pub fn model(&self, id: AccountId) -> Result<GovernanceModel, GovernanceError> {
        self.registry.model(&id)
    }

    pub fn proposal(&self, id: ProposalId) -> Option<&Proposal> {
        self.proposals.get_proposal(&id)
    }

    pub fn proposal_status(&self, id: ProposalId) -> Result<ProposalStatus, GovernanceError> {
        self.proposals.status(&id)
    }

    /// Approvals needed for the proposal to pass, from its snapshot size
    /// and the account's model.
    pub fn required_approvals(&self, proposal_id: ProposalId) -> Result<u32, GovernanceError> {
        let proposal = self
            .proposals
            .get_proposal(&proposal_id)
            .ok_or(GovernanceError::ProposalNotFound(proposal_id))?;
        let model = self.registry.model(&proposal.account_id)?;
        Ok(threshold::required_approvals(model, proposal.snapshot_size()))
    }

    /// Approvals as a percentage of the proposal's snapshot size.
    pub fn approval_percentage(&self, proposal_id: ProposalId) -> Result<f64, GovernanceError> {
        self.proposals.approval_percentage(&proposal_id)
    }

    /// Whether the proposal exists and is still Pending.
    pub fn is_active(&self, proposal_id: ProposalId) -> bool {
        self.proposals.is_active(&proposal_id)
    }

    /// Whether execution at `now` would pass the status, expiry, and
    /// threshold checks. Effect preconditions (balance, last owner) are
    /// only checked by execution itself.
    pub fn can_execute_now(&self, proposal_id: ProposalId, now: u64) -> bool {
        let Some(proposal) = self.proposals.get_proposal(&proposal_id) else {
            return false;
        };
        if proposal.status != ProposalStatus::Pending || proposal.is_expired_at(now) {
            return false;
        }
        match self.registry.model(&proposal.account_id) {
            Ok(model) => threshold::passed(model, proposal.approvals, proposal.snapshot_size()),
            Err(_) => false,
        }
    }

    /// Aggregate counts across both stores.
    pub fn stats(&self) -> GovernanceStats {
        GovernanceStats {
            accounts: self.registry.account_count(),
            proposals: self.proposals.proposal_count(),
            pending_proposals: self.proposals.count_by_status(ProposalStatus::Pending),
            executed_proposals: self.proposals.count_by_status(ProposalStatus::Executed),
            rejected_proposals: self.proposals.count_by_status(ProposalStatus::Rejected),
            expired_proposals: self.proposals.count_by_status(ProposalStatus::Expired),
        }
    }
}

impl Default for GovernanceCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate governance statistics for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GovernanceStats {
    pub accounts: usize,
    pub proposals: usize,
    pub pending_proposals: usize,
    pub executed_proposals: usize,
    pub rejected_proposals: usize,
    pub expired_proposals: usize,
}
