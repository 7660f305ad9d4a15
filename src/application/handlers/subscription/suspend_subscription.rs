//! SuspendSubscriptionHandler - Command handler for the acknowledged-no-op suspend transition.

use std::sync::Arc;

use crate::application::gate::AuthorizationGate;
use crate::domain::account::Account;
use crate::domain::foundation::{AccountId, DomainError};
use crate::domain::subscription::Subscription;
use crate::ports::SubscriptionStore;

/// Command to suspend a subscription.
#[derive(Debug, Clone)]
pub struct SuspendSubscriptionCommand {
    /// The authenticated account issuing the request.
    pub actor: Account,
    /// Target account; defaults to the actor.
    pub account_id: Option<AccountId>,
}

/// Result of a suspension request.
#[derive(Debug, Clone)]
pub struct SuspendSubscriptionResult {
    /// The subscription, untouched.
    pub subscription: Subscription,
}

/// Handler for the suspend transition.
///
/// Suspension enforcement is reserved for a later phase: the handler
/// validates authorization and the record's existence, then acknowledges
/// without mutating anything, so callers and tests can observe that the
/// transition is intentionally inert rather than silently dropped.
pub struct SuspendSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionStore>,
}

impl SuspendSubscriptionHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionStore>) -> Self {
        Self { subscriptions }
    }

    pub async fn handle(
        &self,
        cmd: SuspendSubscriptionCommand,
    ) -> Result<SuspendSubscriptionResult, DomainError> {
        // 1. Superadmin surface only
        AuthorizationGate::authorize_superadmin(&cmd.actor)?;

        // 2. The record must exist
        let target = cmd.account_id.unwrap_or(cmd.actor.id);
        let subscription = self
            .subscriptions
            .find_by_account(&target)
            .await?
            .ok_or_else(|| DomainError::not_found("Subscription not found"))?;

        tracing::info!(
            account_id = %target,
            "Suspension acknowledged without state change"
        );

        Ok(SuspendSubscriptionResult { subscription })
    }
}
