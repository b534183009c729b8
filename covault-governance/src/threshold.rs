//! Pure threshold arithmetic for the two governance models.
//!
//! Every function here computes over the proposal's frozen voter
//! snapshot size `n`, never the live owner set.

use covault_types::GovernanceModel;

/// Number of approvals required to pass with a snapshot of `n` voters.
pub fn required_approvals(model: GovernanceModel, n: u32) -> u32 {
    match model {
        GovernanceModel::Unanimity => n,
        GovernanceModel::Plurality => n / 2 + 1,
    }
}

/// Whether `approvals` out of a snapshot of `n` passes under `model`.
pub fn passed(model: GovernanceModel, approvals: u32, n: u32) -> bool {
    match model {
        GovernanceModel::Unanimity => approvals == n,
        GovernanceModel::Plurality => approvals > n / 2,
    }
}

/// Whether the recorded rejections already terminate the proposal.
///
/// Unanimity dies on the first rejection. Plurality fires only once
/// rejections exceed half the snapshot, which does not catch every
/// mathematically dead tally: with n = 2 a single rejection leaves the
/// proposal open even though it can no longer pass. Kept exactly for
/// compatibility with deployed behavior.
pub fn rejection_makes_impossible(model: GovernanceModel, rejections: u32, n: u32) -> bool {
    match model {
        GovernanceModel::Unanimity => rejections > 0,
        GovernanceModel::Plurality => rejections > n / 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use covault_types::GovernanceModel::{Plurality, Unanimity};

    #[test]
    fn required_approvals_plurality_is_floor_half_plus_one() {
        assert_eq!(required_approvals(Plurality, 1), 1);
        assert_eq!(required_approvals(Plurality, 2), 2);
        assert_eq!(required_approvals(Plurality, 3), 2);
        assert_eq!(required_approvals(Plurality, 4), 3);
        assert_eq!(required_approvals(Plurality, 5), 3);
    }

    #[test]
    fn required_approvals_unanimity_is_everyone() {
        assert_eq!(required_approvals(Unanimity, 1), 1);
        assert_eq!(required_approvals(Unanimity, 7), 7);
    }

    #[test]
    fn plurality_passes_strictly_above_half() {
        assert!(!passed(Plurality, 1, 3));
        assert!(passed(Plurality, 2, 3));
        assert!(!passed(Plurality, 1, 2));
        assert!(passed(Plurality, 2, 2));
        assert!(!passed(Plurality, 2, 4));
        assert!(passed(Plurality, 3, 4));
    }

    #[test]
    fn unanimity_passes_only_with_full_snapshot() {
        assert!(passed(Unanimity, 3, 3));
        assert!(!passed(Unanimity, 2, 3));
    }

    #[test]
    fn unanimity_dies_on_first_rejection() {
        assert!(!rejection_makes_impossible(Unanimity, 0, 5));
        assert!(rejection_makes_impossible(Unanimity, 1, 5));
    }

    #[test]
    fn plurality_rejection_rule_needs_majority_against() {
        assert!(!rejection_makes_impossible(Plurality, 1, 3));
        assert!(rejection_makes_impossible(Plurality, 2, 3));
        assert!(!rejection_makes_impossible(Plurality, 2, 4));
        assert!(rejection_makes_impossible(Plurality, 3, 4));
    }

    // Pins the known gap: one rejection out of two already makes
    // `passed` unreachable, but the rule does not fire until two.
    #[test]
    fn plurality_rejection_rule_does_not_fire_for_split_pair() {
        assert!(!rejection_makes_impossible(Plurality, 1, 2));
        assert!(rejection_makes_impossible(Plurality, 2, 2));
    }
}
