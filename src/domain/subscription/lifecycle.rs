//! Subscription lifecycle state machine.
//!
//! The lifecycle state is derived from field presence on the subscription
//! record rather than stored separately: the provider linkage fields and the
//! cancellation date are the source of truth, so local and provider state
//! cannot disagree about which state the record is in.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Derived lifecycle state of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// Created locally; no provider subscription code yet.
    Provisional,

    /// Provider subscription code and email token both present.
    Linked,

    /// Cancellation date set. Terminal.
    Cancelled,
}

impl LifecycleState {
    /// Returns true for the terminal cancelled state.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LifecycleState::Cancelled)
    }
}

impl StateMachine for LifecycleState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use LifecycleState::*;
        matches!(
            (self, target),
            // From PROVISIONAL
            (Provisional, Linked)
                | (Provisional, Cancelled) // provider disabled before local link
            // From LINKED
                | (Linked, Linked) // repeated link webhooks converge
                | (Linked, Cancelled)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use LifecycleState::*;
        match self {
            Provisional => vec![Linked, Cancelled],
            Linked => vec![Linked, Cancelled],
            Cancelled => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provisional_can_link() {
        let state = LifecycleState::Provisional;
        assert!(state.can_transition_to(&LifecycleState::Linked));

        let result = state.transition_to(LifecycleState::Linked);
        assert_eq!(result.unwrap(), LifecycleState::Linked);
    }

    #[test]
    fn provisional_can_cancel_without_linking() {
        let state = LifecycleState::Provisional;
        let result = state.transition_to(LifecycleState::Cancelled);
        assert_eq!(result.unwrap(), LifecycleState::Cancelled);
    }

    #[test]
    fn linked_can_relink_idempotently() {
        let state = LifecycleState::Linked;
        let result = state.transition_to(LifecycleState::Linked);
        assert_eq!(result.unwrap(), LifecycleState::Linked);
    }

    #[test]
    fn linked_can_cancel() {
        let state = LifecycleState::Linked;
        let result = state.transition_to(LifecycleState::Cancelled);
        assert_eq!(result.unwrap(), LifecycleState::Cancelled);
    }

    #[test]
    fn cancelled_is_terminal() {
        assert!(LifecycleState::Cancelled.is_terminal());
        assert!(!LifecycleState::Cancelled.can_transition_to(&LifecycleState::Linked));
        assert!(!LifecycleState::Cancelled.can_transition_to(&LifecycleState::Provisional));
    }

    #[test]
    fn nothing_returns_to_provisional() {
        assert!(!LifecycleState::Linked.can_transition_to(&LifecycleState::Provisional));
        assert!(!LifecycleState::Provisional.can_transition_to(&LifecycleState::Provisional));
    }

    #[test]
    fn is_cancelled_only_for_cancelled() {
        assert!(LifecycleState::Cancelled.is_cancelled());
        assert!(!LifecycleState::Provisional.is_cancelled());
        assert!(!LifecycleState::Linked.is_cancelled());
    }
}
