//! Account status state machine.
//!
//! Defines the soft lifecycle states of an account. Accounts are never
//! physically deleted; deactivation and suspension are the only exits.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Account in good standing.
    Active,

    /// Account deactivated by its owner or by staff.
    Inactive,

    /// Account suspended by staff pending review.
    Suspended,
}

impl AccountStatus {
    /// Returns true if the account may sign in and invoke operations.
    pub fn is_operational(&self) -> bool {
        matches!(self, AccountStatus::Active)
    }
}

impl StateMachine for AccountStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use AccountStatus::*;
        matches!(
            (self, target),
            // From ACTIVE
            (Active, Inactive)
                | (Active, Suspended)
            // From INACTIVE
                | (Inactive, Active)
            // From SUSPENDED
                | (Suspended, Active)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use AccountStatus::*;
        match self {
            Active => vec![Inactive, Suspended],
            Inactive => vec![Active],
            Suspended => vec![Active],
        }
    }
}
