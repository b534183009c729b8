//! Account records and balance bookkeeping.
//!
//! Accounts are entries in an explicit keyed store; every mutation
//! funnels through the registry's methods. The owner set is changed only
//! by the action executor after a proposal passes — the registry itself
//! never edits membership.

use std::collections::HashMap;

use covault_types::{Account, AccountId, Address, GovernanceEvent, GovernanceModel};
use log::{debug, info};

use crate::error::GovernanceError;
use crate::events::EventSink;

/// Keyed store of every shared account. Accounts are created once and
/// never destroyed.
#[derive(Debug, Default)]
pub struct AccountRegistry {
    accounts: HashMap<AccountId, Account>,
    next_id: u64,
}

impl AccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new account with the given owner set and governance
    /// model, starting at balance zero.
    ///
    /// The model arrives as a caller-supplied name (`"plurality"` or
    /// `"unanimity"`). The owner list is scanned pairwise for duplicates
    /// rather than assumed unique.
    pub fn create_account(
        &mut self,
        owners: Vec<Address>,
        model: &str,
        events: &mut dyn EventSink,
    ) -> Result<AccountId, GovernanceError> {
        let model = GovernanceModel::from_name(model)
            .ok_or_else(|| GovernanceError::InvalidGovernanceModel(model.to_string()))?;

        if owners.is_empty() {
            return Err(GovernanceError::EmptyOwnerSet);
        }

        // Pairwise uniqueness scan.
        for i in 0..owners.len() {
            for j in (i + 1)..owners.len() {
                if owners[i] == owners[j] {
                    return Err(GovernanceError::DuplicateOwner(owners[i]));
                }
            }
        }

        self.next_id += 1;
        let id = AccountId(self.next_id);
        self.accounts.insert(
            id,
            Account {
                id,
                owners: owners.clone(),
                balance: 0,
                model,
            },
        );

        info!(
            "created account {} with {} owners under {}",
            id,
            owners.len(),
            model.name()
        );
        events.emit(GovernanceEvent::AccountCreated {
            account_id: id,
            owners,
            model,
        });
        Ok(id)
    }

    /// Credits `amount` to the account balance. Funding is
    /// permissionless: any party may deposit, no ownership check.
    pub fn deposit(
        &mut self,
        account_id: AccountId,
        amount: u64,
        events: &mut dyn EventSink,
    ) -> Result<u64, GovernanceError> {
        let account = self
            .accounts
            .get_mut(&account_id)
            .ok_or(GovernanceError::AccountNotFound(account_id))?;

        account.balance = account
            .balance
            .checked_add(amount)
            .ok_or(GovernanceError::BalanceOverflow { amount })?;
        let new_balance = account.balance;

        debug!(
            "deposit of {} to account {}, balance now {}",
            amount, account_id, new_balance
        );
        events.emit(GovernanceEvent::DepositReceived {
            account_id,
            amount,
            new_balance,
        });
        Ok(new_balance)
    }

    /// Retrieves an account by id.
    pub fn get_account(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.get(id)
    }

    pub(crate) fn get_account_mut(&mut self, id: &AccountId) -> Option<&mut Account> {
        self.accounts.get_mut(id)
    }

    /// Current owner set of the account.
    pub fn owners(&self, id: &AccountId) -> Result<&[Address], GovernanceError> {
        self.accounts
            .get(id)
            .map(|a| a.owners.as_slice())
            .ok_or(GovernanceError::AccountNotFound(*id))
    }

    /// Current balance of the account.
    pub fn balance(&self, id: &AccountId) -> Result<u64, GovernanceError> {
        self.accounts
            .get(id)
            .map(|a| a.balance)
            .ok_or(GovernanceError::AccountNotFound(*id))
    }

    /// Governance model the account was created under.
    pub fn model(&self, id: &AccountId) -> Result<GovernanceModel, GovernanceError> {
        self.accounts
            .get(id)
            .map(|a| a.model)
            .ok_or(GovernanceError::AccountNotFound(*id))
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }
}
