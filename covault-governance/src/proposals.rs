//! Proposal lifecycle: creation with a frozen owner snapshot, voting,
//! and vote-triggered early termination.
//!
//! A proposal leaves Pending only through vote-triggered rejection, lazy
//! expiry detection, or successful execution. There is no cancellation
//! primitive.

use std::collections::HashMap;

use covault_types::{
    Account, Action, Address, GovernanceEvent, GovernanceModel, Proposal, ProposalId,
    ProposalStatus,
};
use log::{debug, info};

use crate::error::GovernanceError;
use crate::events::EventSink;
use crate::threshold;

/// Keyed store of every proposal, Pending and terminal alike. Terminal
/// proposals are kept for the query surface; they never transition
/// again.
#[derive(Debug, Default)]
pub struct ProposalStore {
    proposals: HashMap<ProposalId, Proposal>,
    next_id: u64,
}

impl ProposalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a proposal against `account`, freezing its current owner
    /// set as the voter snapshot.
    ///
    /// Eligibility is pinned to the snapshot from here on: an owner
    /// removed later keeps their vote on this proposal, and an owner
    /// added later never gains one. Only authorization can fail — a
    /// deadline already in the past is not rejected here, it simply
    /// materializes on the first vote or execution attempt.
    pub fn create_proposal(
        &mut self,
        account: &Account,
        proposer: Address,
        action: Action,
        now: u64,
        expires_at: Option<u64>,
        events: &mut dyn EventSink,
    ) -> Result<ProposalId, GovernanceError> {
        if !account.is_owner(&proposer) {
            return Err(GovernanceError::NotOwner(proposer));
        }

        self.next_id += 1;
        let id = ProposalId(self.next_id);
        let snapshot_owners = account.owners.clone();
        self.proposals.insert(
            id,
            Proposal {
                id,
                account_id: account.id,
                proposer,
                action: action.clone(),
                snapshot_owners: snapshot_owners.clone(),
                voters: Vec::new(),
                approvals: 0,
                rejections: 0,
                status: ProposalStatus::Pending,
                created_at: now,
                expires_at,
            },
        );

        info!(
            "proposal {} created against account {} by {} (snapshot of {})",
            id,
            account.id,
            proposer,
            snapshot_owners.len()
        );
        events.emit(GovernanceEvent::ProposalCreated {
            account_id: account.id,
            proposal_id: id,
            proposer,
            action,
            snapshot_owners,
            expires_at,
        });
        Ok(id)
    }

    /// Casts a vote on a Pending proposal.
    ///
    /// `model` is the owning account's governance model; it only drives
    /// early termination, eligibility comes from the snapshot alone.
    ///
    /// A vote past the deadline is the engine's one mutating failure: it
    /// materializes the Expired status and emits the status change, then
    /// fails with [`GovernanceError::ProposalExpired`]. Any rejection
    /// that makes passing impossible terminates the proposal
    /// immediately; no further votes are accepted after that.
    pub fn vote(
        &mut self,
        model: GovernanceModel,
        proposal_id: ProposalId,
        voter: Address,
        approve: bool,
        now: u64,
        events: &mut dyn EventSink,
    ) -> Result<(), GovernanceError> {
        let proposal = self
            .proposals
            .get_mut(&proposal_id)
            .ok_or(GovernanceError::ProposalNotFound(proposal_id))?;

        if proposal.status != ProposalStatus::Pending {
            return Err(GovernanceError::ProposalNotActive(proposal_id));
        }
        if !proposal.is_eligible(&voter) {
            return Err(GovernanceError::NotEligibleVoter(voter));
        }
        if proposal.has_voted(&voter) {
            return Err(GovernanceError::AlreadyVoted(voter));
        }

        if proposal.is_expired_at(now) {
            proposal.status = ProposalStatus::Expired;
            info!("proposal {} expired at {}", proposal_id, now);
            events.emit(GovernanceEvent::StatusChanged {
                account_id: proposal.account_id,
                proposal_id,
                status: ProposalStatus::Expired,
            });
            return Err(GovernanceError::ProposalExpired(proposal_id));
        }

        proposal.voters.push(voter);
        if approve {
            proposal.approvals += 1;
        } else {
            proposal.rejections += 1;
        }
        debug!(
            "vote on proposal {} by {}: approve={}, tally {}/{} of {}",
            proposal_id,
            voter,
            approve,
            proposal.approvals,
            proposal.rejections,
            proposal.snapshot_size()
        );
        events.emit(GovernanceEvent::VoteCast {
            account_id: proposal.account_id,
            proposal_id,
            voter,
            approve,
            approvals: proposal.approvals,
            rejections: proposal.rejections,
        });

        if threshold::rejection_makes_impossible(model, proposal.rejections, proposal.snapshot_size())
        {
            proposal.status = ProposalStatus::Rejected;
            info!(
                "proposal {} rejected: {} of {} snapshot voters against",
                proposal_id,
                proposal.rejections,
                proposal.snapshot_size()
            );
            events.emit(GovernanceEvent::StatusChanged {
                account_id: proposal.account_id,
                proposal_id,
                status: ProposalStatus::Rejected,
            });
        }
        Ok(())
    }

    /// Retrieves a proposal by id.
    pub fn get_proposal(&self, id: &ProposalId) -> Option<&Proposal> {
        self.proposals.get(id)
    }

    pub(crate) fn get_proposal_mut(&mut self, id: &ProposalId) -> Option<&mut Proposal> {
        self.proposals.get_mut(id)
    }

    /// Current status of a proposal.
    pub fn status(&self, id: &ProposalId) -> Result<ProposalStatus, GovernanceError> {
        self.proposals
            .get(id)
            .map(|p| p.status)
            .ok_or(GovernanceError::ProposalNotFound(*id))
    }

    /// Whether the proposal exists and is still Pending.
    pub fn is_active(&self, id: &ProposalId) -> bool {
        self.proposals
            .get(id)
            .map(|p| p.status == ProposalStatus::Pending)
            .unwrap_or(false)
    }

    /// Approvals as a percentage of the snapshot size.
    pub fn approval_percentage(&self, id: &ProposalId) -> Result<f64, GovernanceError> {
        let proposal = self
            .proposals
            .get(id)
            .ok_or(GovernanceError::ProposalNotFound(*id))?;
        let n = proposal.snapshot_size();
        if n == 0 {
            return Ok(0.0);
        }
        Ok(proposal.approvals as f64 * 100.0 / n as f64)
    }

    pub fn proposal_count(&self) -> usize {
        self.proposals.len()
    }

    /// Number of proposals currently in `status`.
    pub fn count_by_status(&self, status: ProposalStatus) -> usize {
        self.proposals
            .values()
            .filter(|p| p.status == status)
            .count()
    }
}
