//! ChangePlanHandler - Command handler for moving a subscription between plans.

use std::sync::Arc;

use crate::application::gate::AuthorizationGate;
use crate::domain::account::Account;
use crate::domain::foundation::{AccountId, DomainError, PlanId};
use crate::domain::plan::Plan;
use crate::domain::subscription::{minor_to_major, Subscription};
use crate::ports::{BillingProvider, PlanStore, SubscriptionStore};

/// Command to move a subscription to another plan.
#[derive(Debug, Clone)]
pub struct ChangePlanCommand {
    /// The authenticated account issuing the request.
    pub actor: Account,
    /// Target account; defaults to the actor (self-service path).
    pub account_id: Option<AccountId>,
    /// The plan the caller wants to move to.
    pub plan_id: PlanId,
}

/// Result of a plan change.
#[derive(Debug, Clone)]
pub struct ChangePlanResult {
    pub subscription: Subscription,
    /// The plan the provider actually applied.
    pub plan: Plan,
}

/// Handler for plan changes.
///
/// The provider's response is authoritative: the local record re-points to
/// the plan identified by the returned provider plan code and takes the
/// returned amount, guarding against drift between the caller's view of the
/// catalog and the provider's.
pub struct ChangePlanHandler {
    provider: Arc<dyn BillingProvider>,
    plans: Arc<dyn PlanStore>,
    subscriptions: Arc<dyn SubscriptionStore>,
}

impl ChangePlanHandler {
    pub fn new(
        provider: Arc<dyn BillingProvider>,
        plans: Arc<dyn PlanStore>,
        subscriptions: Arc<dyn SubscriptionStore>,
    ) -> Self {
        Self {
            provider,
            plans,
            subscriptions,
        }
    }

    pub async fn handle(&self, cmd: ChangePlanCommand) -> Result<ChangePlanResult, DomainError> {
        // 1. Resolve the target and check ownership before anything else
        let target = cmd.account_id.unwrap_or(cmd.actor.id);
        AuthorizationGate::authorize_owner_or_superadmin(&cmd.actor, &target)?;

        // 2. Load the target's subscription
        let mut subscription = self
            .subscriptions
            .find_by_account(&target)
            .await?
            .ok_or_else(|| DomainError::not_found("Subscription not found"))?;

        // 3. Preconditions, all before the remote call
        if subscription.is_cancelled() {
            return Err(DomainError::precondition_failed(
                "Cancelled subscription cannot change plan",
            ));
        }
        let code = subscription.require_subscription_code()?.to_string();

        let requested = self
            .plans
            .find_by_id(&cmd.plan_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Plan not found"))?;
        let requested_code = requested.require_provider_code()?.to_string();

        // 4. Apply at the provider
        let update = self
            .provider
            .update_subscription(&code, &requested_code)
            .await?;

        // 5. Resolve the plan the provider reports, not the one requested
        let resolved = self
            .plans
            .find_by_provider_code(&update.plan_code)
            .await?
            .ok_or_else(|| {
                DomainError::not_found("No local plan matches the provider plan code")
                    .with_detail("provider_plan_code", update.plan_code.clone())
            })?;

        let amount = minor_to_major(update.amount_minor);

        // 6. Record locally, conditional on still not being cancelled
        let applied = self
            .subscriptions
            .record_plan_change(&subscription.id, &resolved.id, amount)
            .await?;
        if !applied {
            return Err(DomainError::precondition_failed(
                "Subscription was cancelled during plan change",
            ));
        }

        subscription.change_plan(resolved.id, amount)?;

        tracing::info!(
            account_id = %target,
            subscription_code = %code,
            plan_id = %resolved.id,
            "Changed subscription plan"
        );

        Ok(ChangePlanResult {
            subscription,
            plan: resolved,
        })
    }
}
