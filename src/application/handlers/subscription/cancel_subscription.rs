//! CancelSubscriptionHandler - Command handler for user- and staff-initiated cancellation.

use std::sync::Arc;

use crate::application::gate::AuthorizationGate;
use crate::domain::account::Account;
use crate::domain::foundation::{AccountId, DomainError, Timestamp};
use crate::domain::subscription::Subscription;
use crate::ports::{BillingProvider, SubscriptionStore};

/// Command to cancel a subscription.
#[derive(Debug, Clone)]
pub struct CancelSubscriptionCommand {
    /// The authenticated account issuing the request.
    pub actor: Account,
    /// Target account; defaults to the actor (self-service path).
    pub account_id: Option<AccountId>,
    /// Optional reason recorded with the cancellation.
    pub reason: Option<String>,
}

/// Result of a cancellation request.
#[derive(Debug, Clone)]
pub struct CancelSubscriptionResult {
    /// The subscription after the request; cancelled, whether by this
    /// request or an earlier one.
    pub subscription: Subscription,
}

/// Handler for cancelling subscriptions.
///
/// The provider is disabled first and the local record updated only after it
/// confirms; the local record never claims a cancellation the provider has
/// not performed. An already-cancelled record short-circuits without a
/// provider call.
pub struct CancelSubscriptionHandler {
    provider: Arc<dyn BillingProvider>,
    subscriptions: Arc<dyn SubscriptionStore>,
}

impl CancelSubscriptionHandler {
    pub fn new(
        provider: Arc<dyn BillingProvider>,
        subscriptions: Arc<dyn SubscriptionStore>,
    ) -> Self {
        Self {
            provider,
            subscriptions,
        }
    }

    pub async fn handle(
        &self,
        cmd: CancelSubscriptionCommand,
    ) -> Result<CancelSubscriptionResult, DomainError> {
        // 1. Resolve the target and check ownership before anything else
        let target = cmd.account_id.unwrap_or(cmd.actor.id);
        AuthorizationGate::authorize_owner_or_superadmin(&cmd.actor, &target)?;

        // 2. Load the target's subscription
        let mut subscription = self
            .subscriptions
            .find_by_account(&target)
            .await?
            .ok_or_else(|| DomainError::not_found("Subscription not found"))?;

        // 3. Already cancelled: converge without re-sending the disable call
        if subscription.is_cancelled() {
            tracing::info!(
                account_id = %target,
                "Cancellation requested for already-cancelled subscription"
            );
            return Ok(CancelSubscriptionResult { subscription });
        }

        // 4. Both provider identifiers must be present to disable remotely
        let (code, token) = subscription.require_provider_link()?;
        let (code, token) = (code.to_string(), token.to_string());

        // 5. Disable at the provider; any failure aborts before a local write
        self.provider.disable_subscription(&code, &token).await?;

        // 6. Record locally, conditional on still not being cancelled
        let cancelled_at = Timestamp::now();
        let applied = self
            .subscriptions
            .record_cancellation(&subscription.id, cancelled_at, cmd.reason.clone())
            .await?;

        if applied {
            subscription.record_cancellation(cancelled_at, cmd.reason);
            tracing::info!(
                account_id = %target,
                subscription_code = %code,
                "Cancelled subscription"
            );
            return Ok(CancelSubscriptionResult { subscription });
        }

        // Lost the race to a concurrent cancellation; return the record that won
        let subscription = self
            .subscriptions
            .find_by_id(&subscription.id)
            .await?
            .ok_or_else(|| {
                DomainError::persistence("Subscription disappeared during cancellation")
            })?;

        Ok(CancelSubscriptionResult { subscription })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySubscriptionStore;
    use crate::adapters::paystack::MockBillingProvider;
    use crate::domain::account::AccountRole;
    use crate::domain::foundation::{Email, ErrorCode, PlanId};
    use crate::ports::ProviderError;
    use rust_decimal::Decimal;

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn member(email: &str) -> Account {
        Account::register(Email::new(email).unwrap(), "digest".to_string())
    }

    fn superadmin() -> Account {
        Account::invite(Email::new("root@example.com").unwrap(), AccountRole::Superadmin)
    }

    fn linked_subscription(account_id: AccountId) -> Subscription {
        let mut subscription =
            Subscription::provisional(account_id, PlanId::new(), Decimal::from(5000));
        subscription.backfill_provider_identity(
            "SUB_abc",
            "token_xyz",
            Some(Timestamp::now().add_days(30)),
        );
        subscription
    }

    async fn store_with(subscription: &Subscription) -> Arc<InMemorySubscriptionStore> {
        let store = Arc::new(InMemorySubscriptionStore::new());
        store.create(subscription).await.unwrap();
        store
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Success Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn owner_cancels_linked_subscription() {
        let owner = member("owner@example.com");
        let subscription = linked_subscription(owner.id);
        let store = store_with(&subscription).await;
        let provider = Arc::new(MockBillingProvider::new());

        let handler = CancelSubscriptionHandler::new(provider.clone(), store.clone());

        let cmd = CancelSubscriptionCommand {
            actor: owner,
            account_id: None,
            reason: Some("Too expensive".to_string()),
        };

        let result = handler.handle(cmd).await.unwrap();

        assert!(result.subscription.is_cancelled());
        assert_eq!(
            result.subscription.cancellation_reason.as_deref(),
            Some("Too expensive")
        );

        let stored = store.find_by_id(&subscription.id).await.unwrap().unwrap();
        assert!(stored.cancelled_at.is_some());
        assert!(provider.was_called("disable_subscription"));
    }

    #[tokio::test]
    async fn superadmin_cancels_foreign_subscription() {
        let owner = member("owner@example.com");
        let subscription = linked_subscription(owner.id);
        let store = store_with(&subscription).await;
        let provider = Arc::new(MockBillingProvider::new());

        let handler = CancelSubscriptionHandler::new(provider, store.clone());

        let cmd = CancelSubscriptionCommand {
            actor: superadmin(),
            account_id: Some(owner.id),
            reason: None,
        };

        let result = handler.handle(cmd).await.unwrap();

        assert!(result.subscription.is_cancelled());
    }

    #[tokio::test]
    async fn already_cancelled_returns_without_provider_call() {
        let owner = member("owner@example.com");
        let mut subscription = linked_subscription(owner.id);
        subscription.record_cancellation(Timestamp::now(), Some("earlier".to_string()));
        let store = store_with(&subscription).await;
        let provider = Arc::new(MockBillingProvider::new());

        let handler = CancelSubscriptionHandler::new(provider.clone(), store);

        let cmd = CancelSubscriptionCommand {
            actor: owner,
            account_id: None,
            reason: Some("again".to_string()),
        };

        let result = handler.handle(cmd).await.unwrap();

        // First cancellation stands untouched
        assert_eq!(
            result.subscription.cancellation_reason.as_deref(),
            Some("earlier")
        );
        assert!(!provider.was_called("disable_subscription"));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Failure Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn stranger_is_forbidden() {
        let owner = member("owner@example.com");
        let subscription = linked_subscription(owner.id);
        let store = store_with(&subscription).await;
        let provider = Arc::new(MockBillingProvider::new());

        let handler = CancelSubscriptionHandler::new(provider.clone(), store.clone());

        let cmd = CancelSubscriptionCommand {
            actor: member("stranger@example.com"),
            account_id: Some(owner.id),
            reason: None,
        };

        let result = handler.handle(cmd).await;

        assert_eq!(result.unwrap_err().code, ErrorCode::Forbidden);
        assert!(!provider.was_called("disable_subscription"));

        let stored = store.find_by_id(&subscription.id).await.unwrap().unwrap();
        assert!(stored.cancelled_at.is_none());
    }

    #[tokio::test]
    async fn missing_subscription_is_not_found() {
        let store = Arc::new(InMemorySubscriptionStore::new());
        let provider = Arc::new(MockBillingProvider::new());

        let handler = CancelSubscriptionHandler::new(provider, store);

        let cmd = CancelSubscriptionCommand {
            actor: member("owner@example.com"),
            account_id: None,
            reason: None,
        };

        let result = handler.handle(cmd).await;

        assert_eq!(result.unwrap_err().code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn provisional_subscription_fails_precondition() {
        let owner = member("owner@example.com");
        let subscription = Subscription::provisional(owner.id, PlanId::new(), Decimal::from(5000));
        let store = store_with(&subscription).await;
        let provider = Arc::new(MockBillingProvider::new());

        let handler = CancelSubscriptionHandler::new(provider.clone(), store.clone());

        let cmd = CancelSubscriptionCommand {
            actor: owner,
            account_id: None,
            reason: None,
        };

        let result = handler.handle(cmd).await;

        assert_eq!(result.unwrap_err().code, ErrorCode::PreconditionFailed);
        assert!(!provider.was_called("disable_subscription"));

        let stored = store.find_by_id(&subscription.id).await.unwrap().unwrap();
        assert!(stored.cancelled_at.is_none());
    }

    #[tokio::test]
    async fn provider_failure_leaves_record_unchanged() {
        let owner = member("owner@example.com");
        let subscription = linked_subscription(owner.id);
        let store = store_with(&subscription).await;
        let provider = Arc::new(MockBillingProvider::new());
        provider.set_method_error(
            "disable_subscription",
            ProviderError::Api {
                status: 502,
                message: "provider unavailable".to_string(),
            },
        );

        let handler = CancelSubscriptionHandler::new(provider, store.clone());

        let cmd = CancelSubscriptionCommand {
            actor: owner,
            account_id: None,
            reason: None,
        };

        let result = handler.handle(cmd).await;

        assert_eq!(result.unwrap_err().code, ErrorCode::ProviderError);

        let stored = store.find_by_id(&subscription.id).await.unwrap().unwrap();
        assert!(stored.cancelled_at.is_none());
    }
}
