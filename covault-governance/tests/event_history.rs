//! Notification-channel contract: exactly one event per state
//! transition, commit-before-interaction ordering for transfers, and
//! enough information in the stream to reconstruct history.

use std::sync::{Arc, Mutex};

use covault_governance::{
    Action, AccountId, Address, EventLog, GovernanceCoordinator, GovernanceError, GovernanceEvent,
    GovernanceModel, ProposalId, ProposalStatus, ValueTransfer,
};

fn addr(n: u8) -> Address {
    Address([n; 32])
}

/// Transfer backend that records each payout together with a snapshot of
/// the events already emitted when it was invoked.
#[derive(Clone)]
struct RecordingTransfer {
    log: EventLog,
    calls: Arc<Mutex<Vec<(AccountId, Address, u64, Vec<GovernanceEvent>)>>>,
}

impl RecordingTransfer {
    fn new(log: EventLog) -> Self {
        Self {
            log,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn calls(&self) -> Vec<(AccountId, Address, u64, Vec<GovernanceEvent>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ValueTransfer for RecordingTransfer {
    fn transfer(&mut self, from: AccountId, to: Address, amount: u64) {
        let seen = self.log.events();
        self.calls.lock().unwrap().push((from, to, amount, seen));
    }
}

fn coordinator_with_observers() -> (GovernanceCoordinator, EventLog, RecordingTransfer) {
    let log = EventLog::new();
    let transfers = RecordingTransfer::new(log.clone());
    let gov = GovernanceCoordinator::with_collaborators(
        Box::new(log.clone()),
        Box::new(transfers.clone()),
    );
    (gov, log, transfers)
}

#[test]
fn full_flow_emits_exactly_one_event_per_transition() {
    let (mut gov, log, _) = coordinator_with_observers();
    let (a, b, c, recipient) = (addr(1), addr(2), addr(3), addr(9));

    let account = gov.create_account(vec![a, b, c], "plurality").unwrap();
    gov.deposit(account, 1000).unwrap();
    let proposal = gov
        .create_proposal(account, a, Action::transfer(recipient, 400), 10, Some(500))
        .unwrap();
    gov.vote(account, proposal, a, true, 11).unwrap();
    gov.vote(account, proposal, b, true, 12).unwrap();
    gov.execute_proposal(account, proposal, 13).unwrap();

    let expected = vec![
        GovernanceEvent::AccountCreated {
            account_id: account,
            owners: vec![a, b, c],
            model: GovernanceModel::Plurality,
        },
        GovernanceEvent::DepositReceived {
            account_id: account,
            amount: 1000,
            new_balance: 1000,
        },
        GovernanceEvent::ProposalCreated {
            account_id: account,
            proposal_id: proposal,
            proposer: a,
            action: Action::transfer(recipient, 400),
            snapshot_owners: vec![a, b, c],
            expires_at: Some(500),
        },
        GovernanceEvent::VoteCast {
            account_id: account,
            proposal_id: proposal,
            voter: a,
            approve: true,
            approvals: 1,
            rejections: 0,
        },
        GovernanceEvent::VoteCast {
            account_id: account,
            proposal_id: proposal,
            voter: b,
            approve: true,
            approvals: 2,
            rejections: 0,
        },
        GovernanceEvent::StatusChanged {
            account_id: account,
            proposal_id: proposal,
            status: ProposalStatus::Executed,
        },
    ];
    assert_eq!(log.events(), expected);
}

#[test]
fn transfer_backend_runs_only_after_the_status_commit() {
    let (mut gov, _, transfers) = coordinator_with_observers();
    let (a, b) = (addr(1), addr(2));

    let account = gov.create_account(vec![a, b], "unanimity").unwrap();
    gov.deposit(account, 50).unwrap();
    let proposal = gov
        .create_proposal(account, a, Action::transfer(addr(9), 50), 0, None)
        .unwrap();
    gov.vote(account, proposal, a, true, 1).unwrap();
    gov.vote(account, proposal, b, true, 2).unwrap();
    gov.execute_proposal(account, proposal, 3).unwrap();

    let calls = transfers.calls();
    assert_eq!(calls.len(), 1);
    let (from, to, amount, seen) = &calls[0];
    assert_eq!((*from, *to, *amount), (account, addr(9), 50));

    // The Executed notification was already on the wire when the
    // backend was invoked.
    assert!(seen.contains(&GovernanceEvent::StatusChanged {
        account_id: account,
        proposal_id: proposal,
        status: ProposalStatus::Executed,
    }));
}

#[test]
fn failed_execution_never_reaches_the_transfer_backend() {
    let (mut gov, _, transfers) = coordinator_with_observers();
    let (a, b) = (addr(1), addr(2));

    let account = gov.create_account(vec![a, b], "unanimity").unwrap();
    let proposal = gov
        .create_proposal(account, a, Action::transfer(addr(9), 10), 0, None)
        .unwrap();
    gov.vote(account, proposal, a, true, 1).unwrap();

    assert!(gov.execute_proposal(account, proposal, 2).is_err());
    assert!(transfers.calls().is_empty());
}

#[test]
fn expiry_is_notified_exactly_once() {
    let (mut gov, log, _) = coordinator_with_observers();
    let (a, b) = (addr(1), addr(2));

    let account = gov.create_account(vec![a, b], "plurality").unwrap();
    let proposal = gov
        .create_proposal(account, a, Action::add_owner(addr(5)), 0, Some(100))
        .unwrap();

    assert_eq!(
        gov.vote(account, proposal, a, true, 150).unwrap_err(),
        GovernanceError::ProposalExpired(proposal)
    );
    // Later attempts fail on the terminal status without re-notifying.
    assert!(gov.vote(account, proposal, b, true, 151).is_err());
    assert!(gov.execute_proposal(account, proposal, 152).is_err());

    let status_changes: Vec<_> = log
        .events()
        .into_iter()
        .filter(|e| matches!(e, GovernanceEvent::StatusChanged { .. }))
        .collect();
    assert_eq!(
        status_changes,
        vec![GovernanceEvent::StatusChanged {
            account_id: account,
            proposal_id: proposal,
            status: ProposalStatus::Expired,
        }]
    );
}

#[test]
fn early_rejection_is_notified_exactly_once() {
    let (mut gov, log, _) = coordinator_with_observers();
    let (a, b) = (addr(1), addr(2));

    let account = gov.create_account(vec![a, b], "unanimity").unwrap();
    let proposal = gov
        .create_proposal(account, a, Action::add_owner(addr(5)), 0, None)
        .unwrap();
    gov.vote(account, proposal, b, false, 1).unwrap();

    let events = log.events();
    let status_changes = events
        .iter()
        .filter(|e| matches!(e, GovernanceEvent::StatusChanged { .. }))
        .count();
    assert_eq!(status_changes, 1);

    // The vote is recorded first, then the termination it triggered.
    assert_eq!(
        events.last(),
        Some(&GovernanceEvent::StatusChanged {
            account_id: account,
            proposal_id: proposal,
            status: ProposalStatus::Rejected,
        })
    );
}

/// Minimal observer replica built purely from the event stream.
#[derive(Default)]
struct Replica {
    balance: u64,
    owners: Vec<Address>,
    proposal_amounts: std::collections::HashMap<ProposalId, u64>,
    statuses: std::collections::HashMap<ProposalId, ProposalStatus>,
}

impl Replica {
    fn apply(&mut self, event: &GovernanceEvent) {
        match event {
            GovernanceEvent::AccountCreated { owners, .. } => {
                self.owners = owners.clone();
                self.balance = 0;
            }
            GovernanceEvent::DepositReceived { new_balance, .. } => {
                self.balance = *new_balance;
            }
            GovernanceEvent::ProposalCreated {
                proposal_id,
                action,
                ..
            } => {
                self.proposal_amounts.insert(*proposal_id, action.amount);
                self.statuses.insert(*proposal_id, ProposalStatus::Pending);
            }
            GovernanceEvent::VoteCast { .. } => {}
            GovernanceEvent::StatusChanged {
                proposal_id,
                status,
                ..
            } => {
                if *status == ProposalStatus::Executed {
                    self.balance -= self.proposal_amounts[proposal_id];
                }
                self.statuses.insert(*proposal_id, *status);
            }
        }
    }
}

#[test]
fn event_stream_reconstructs_account_history() {
    let (mut gov, log, _) = coordinator_with_observers();
    let (a, b) = (addr(1), addr(2));

    let account = gov.create_account(vec![a, b], "plurality").unwrap();
    gov.deposit(account, 700).unwrap();
    gov.deposit(account, 300).unwrap();

    let paid = gov
        .create_proposal(account, a, Action::transfer(addr(9), 250), 0, None)
        .unwrap();
    gov.vote(account, paid, a, true, 1).unwrap();
    gov.vote(account, paid, b, true, 2).unwrap();
    gov.execute_proposal(account, paid, 3).unwrap();

    let dead = gov
        .create_proposal(account, b, Action::transfer(addr(9), 999), 4, Some(10))
        .unwrap();
    let _ = gov.vote(account, dead, a, true, 20);

    let mut replica = Replica::default();
    for event in log.events() {
        replica.apply(&event);
    }

    assert_eq!(replica.balance, gov.balance(account).unwrap());
    assert_eq!(replica.owners.as_slice(), gov.owners(account).unwrap());
    assert_eq!(
        replica.statuses[&paid],
        gov.proposal_status(paid).unwrap()
    );
    assert_eq!(
        replica.statuses[&dead],
        gov.proposal_status(dead).unwrap()
    );
}

#[test]
fn events_serialize_for_external_consumers() {
    let event = GovernanceEvent::VoteCast {
        account_id: AccountId(1),
        proposal_id: ProposalId(2),
        voter: addr(3),
        approve: true,
        approvals: 1,
        rejections: 0,
    };

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["VoteCast"]["approvals"], 1);
    assert_eq!(value["VoteCast"]["approve"], true);
}
