//! ResolveManageLinkHandler - Command handler for provider manage-link resolution.

use std::sync::Arc;

use crate::domain::account::Account;
use crate::domain::foundation::DomainError;
use crate::domain::subscription::Subscription;
use crate::ports::{BillingProvider, PlanStore, SubscriptionStore};

/// Command to resolve the provider-hosted manage link for the actor's own
/// subscription.
#[derive(Debug, Clone)]
pub struct ResolveManageLinkCommand {
    /// The authenticated account; manage links are always self-scoped.
    pub actor: Account,
}

/// Result of manage-link resolution.
#[derive(Debug, Clone)]
pub struct ResolveManageLinkResult {
    /// Provider-hosted self-service URL.
    pub link: String,
    /// The subscription, including any identity backfilled on the way.
    pub subscription: Subscription,
}

/// Handler for resolving manage links.
///
/// A linked subscription requests its link directly. A provisional one is
/// first matched against the provider by plan and customer: exactly one match
/// backfills the provider identity before the link is requested; zero matches
/// fail rather than fabricate a code.
pub struct ResolveManageLinkHandler {
    provider: Arc<dyn BillingProvider>,
    plans: Arc<dyn PlanStore>,
    subscriptions: Arc<dyn SubscriptionStore>,
}

impl ResolveManageLinkHandler {
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

    pub async fn handle(
        &self,
        cmd: ResolveManageLinkCommand,
    ) -> Result<ResolveManageLinkResult, DomainError> {
        // 1. Load the actor's subscription
        let mut subscription = self
            .subscriptions
            .find_by_account(&cmd.actor.id)
            .await?
            .ok_or_else(|| DomainError::not_found("Subscription not found"))?;

        // 2. Already linked: request the link directly
        if let Some(code) = subscription.subscription_code.clone() {
            let link = self.provider.generate_manage_link(&code).await?;
            return Ok(ResolveManageLinkResult { link, subscription });
        }

        // 3. Provisional: match against the provider by plan and customer
        let plan = self
            .plans
            .find_by_id(&subscription.plan_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Plan not found"))?;
        let plan_code = plan.require_provider_code()?.to_string();

        let customer = subscription
            .customer_code
            .clone()
            .unwrap_or_else(|| cmd.actor.email.to_string());

        let matches = self
            .provider
            .fetch_subscriptions_by_plan_and_customer(&plan_code, &customer)
            .await?;

        if matches.len() > 1 {
            return Err(DomainError::precondition_failed(
                "Provider returned multiple subscriptions for this plan and customer",
            )
            .with_detail("match_count", matches.len().to_string()));
        }

        let matched = match matches.into_iter().next() {
            Some(matched) => matched,
            None => {
                tracing::warn!(
                    account_id = %cmd.actor.id,
                    "No provider subscription found to back the local record"
                );
                return Err(DomainError::not_found(
                    "No provider subscription found for this plan and customer",
                ));
            }
        };

        // 4. Backfill the provider identity before requesting the link
        match matched.email_token {
            Some(token) => {
                self.subscriptions
                    .record_provider_identity(
                        &subscription.id,
                        &matched.subscription_code,
                        &token,
                        matched.next_payment_date,
                    )
                    .await?;
                subscription.backfill_provider_identity(
                    &matched.subscription_code,
                    token,
                    matched.next_payment_date,
                );
            }
            None => {
                self.subscriptions
                    .record_provider_link(
                        &subscription.id,
                        &matched.subscription_code,
                        matched.next_payment_date,
                    )
                    .await?;
                subscription.link(&matched.subscription_code, matched.next_payment_date);
            }
        }

        tracing::info!(
            account_id = %cmd.actor.id,
            subscription_code = %matched.subscription_code,
            "Backfilled provider identity from manage-link resolution"
        );

        // 5. Request the link with the freshly linked code
        let link = self
            .provider
            .generate_manage_link(&matched.subscription_code)
            .await?;

        Ok(ResolveManageLinkResult { link, subscription })
    }
}
