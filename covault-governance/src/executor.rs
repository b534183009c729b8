//! Applies a passed proposal's action to its account.
//!
//! Ordering is checks-effects-interactions: every precondition is
//! verified first, the Executed status and its notification are
//! committed next, and the external transfer collaborator is invoked
//! last. Internal bookkeeping is never left pending while an externally
//! observable transfer is in flight.

use covault_types::{
    AccountId, ActionKind, Address, GovernanceEvent, ProposalId, ProposalStatus,
};
use log::{info, warn};

use crate::account_registry::AccountRegistry;
use crate::error::GovernanceError;
use crate::events::EventSink;
use crate::proposals::ProposalStore;
use crate::threshold;

/// Moves value out of an account once a Transfer proposal commits.
///
/// The engine's contract with the backend is ordering-only: the Executed
/// status and its notification are committed before this is invoked, and
/// nothing beyond completion is consumed from it.
pub trait ValueTransfer {
    fn transfer(&mut self, from: AccountId, to: Address, amount: u64);
}

/// Backend for deployments without a settlement layer: records the
/// payout in the log and nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingTransfer;

impl ValueTransfer for LoggingTransfer {
    fn transfer(&mut self, from: AccountId, to: Address, amount: u64) {
        info!("transfer of {} from account {} to {}", amount, from, to);
    }
}

/// Executes a passed proposal against its account.
///
/// Any caller may trigger execution; the tally, not the trigger, is the
/// authorization. The expiry check here is independent of the vote-time
/// check — a threshold met just before the deadline must not execute
/// after it — and, like the vote-time check, it materializes the
/// Expired status before failing. `ThresholdNotMet` and
/// `InsufficientBalance` leave the proposal Pending and are retryable as
/// more votes or deposits arrive. `CannotRemoveLastOwner` is a hard
/// abort with no partial mutation: an ownerless account would strand its
/// funds permanently.
pub fn execute_proposal(
    registry: &mut AccountRegistry,
    proposals: &mut ProposalStore,
    transfers: &mut dyn ValueTransfer,
    events: &mut dyn EventSink,
    account_id: AccountId,
    proposal_id: ProposalId,
    now: u64,
) -> Result<(), GovernanceError> {
    let proposal = proposals
        .get_proposal_mut(&proposal_id)
        .ok_or(GovernanceError::ProposalNotFound(proposal_id))?;

    if proposal.status != ProposalStatus::Pending {
        return Err(GovernanceError::ProposalNotActive(proposal_id));
    }
    if proposal.account_id != account_id {
        return Err(GovernanceError::ProposalAccountMismatch {
            proposal_id,
            account_id,
        });
    }

    if proposal.is_expired_at(now) {
        proposal.status = ProposalStatus::Expired;
        warn!("proposal {} expired before execution", proposal_id);
        events.emit(GovernanceEvent::StatusChanged {
            account_id,
            proposal_id,
            status: ProposalStatus::Expired,
        });
        return Err(GovernanceError::ProposalExpired(proposal_id));
    }

    let model = registry.model(&account_id)?;
    let n = proposal.snapshot_size();
    if !threshold::passed(model, proposal.approvals, n) {
        return Err(GovernanceError::ThresholdNotMet {
            approvals: proposal.approvals,
            required: threshold::required_approvals(model, n),
        });
    }

    let account = registry
        .get_account_mut(&account_id)
        .ok_or(GovernanceError::AccountNotFound(account_id))?;

    // Effect preconditions. These abort with the proposal still Pending
    // and the account untouched.
    let action = proposal.action.clone();
    match action.kind {
        ActionKind::Transfer => {
            if account.balance < action.amount {
                return Err(GovernanceError::InsufficientBalance {
                    balance: account.balance,
                    requested: action.amount,
                });
            }
        }
        ActionKind::RemoveOwner => {
            if account.is_owner(&action.target) && account.owner_count() == 1 {
                return Err(GovernanceError::CannotRemoveLastOwner(action.target));
            }
        }
        ActionKind::AddOwner => {}
    }

    // Commit the terminal status and its notification before any effect
    // leaves the engine.
    proposal.status = ProposalStatus::Executed;
    events.emit(GovernanceEvent::StatusChanged {
        account_id,
        proposal_id,
        status: ProposalStatus::Executed,
    });
    info!(
        "proposal {} executed against account {}",
        proposal_id, account_id
    );

    match action.kind {
        ActionKind::Transfer => {
            account.balance -= action.amount;
            transfers.transfer(account_id, action.target, action.amount);
        }
        ActionKind::AddOwner => {
            // Already an owner: the proposal's intent is satisfied.
            if !account.is_owner(&action.target) {
                account.owners.push(action.target);
            }
        }
        ActionKind::RemoveOwner => {
            // Absent target: nothing to remove, still a success.
            account.owners.retain(|owner| owner != &action.target);
        }
    }
    Ok(())
}
