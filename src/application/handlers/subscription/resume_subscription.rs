//! ResumeSubscriptionHandler - Command handler for the (unimplemented) resume transition.

use std::sync::Arc;

use crate::application::gate::AuthorizationGate;
use crate::domain::account::Account;
use crate::domain::foundation::{AccountId, DomainError};
use crate::ports::SubscriptionStore;

/// Command to resume a subscription.
#[derive(Debug, Clone)]
pub struct ResumeSubscriptionCommand {
    /// The authenticated account issuing the request.
    pub actor: Account,
    /// Target account; defaults to the actor.
    pub account_id: Option<AccountId>,
}

/// Handler for the resume transition.
///
/// Resume is not wired to the provider yet. The handler validates
/// authorization and the record's state, then fails `NotImplemented` rather
/// than claim a state change that did not occur at the provider. There is no
/// success result type until the transition exists.
pub struct ResumeSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionStore>,
}

impl ResumeSubscriptionHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionStore>) -> Self {
        Self { subscriptions }
    }

    pub async fn handle(&self, cmd: ResumeSubscriptionCommand) -> Result<(), DomainError> {
        // 1. Superadmin surface only
        AuthorizationGate::authorize_superadmin(&cmd.actor)?;

        // 2. The record must exist and not be cancelled
        let target = cmd.account_id.unwrap_or(cmd.actor.id);
        let subscription = self
            .subscriptions
            .find_by_account(&target)
            .await?
            .ok_or_else(|| DomainError::not_found("Subscription not found"))?;

        if subscription.is_cancelled() {
            return Err(DomainError::precondition_failed(
                "Cancelled subscription cannot resume",
            ));
        }

        Err(DomainError::not_implemented(
            "Subscription resume is not supported yet",
        ))
    }
}
