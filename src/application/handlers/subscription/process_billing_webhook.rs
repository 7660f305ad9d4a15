//! ProcessBillingWebhookHandler - Command handler for provider webhook deliveries.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Email, Timestamp};
use crate::domain::subscription::Subscription;
use crate::ports::{AccountStore, BillingProvider, ProviderEvent, SubscriptionStore};

/// Command to process a raw webhook delivery.
#[derive(Debug, Clone)]
pub struct ProcessBillingWebhookCommand {
    /// Raw request body, exactly as delivered.
    pub payload: Vec<u8>,
    /// Value of the provider's signature header.
    pub signature: String,
}

/// Result of webhook processing.
#[derive(Debug, Clone)]
pub enum ProcessBillingWebhookResult {
    /// Remote subscription matched and linked locally.
    Linked { subscription: Subscription },
    /// Remote disable applied (or converged) locally.
    Cancelled {
        subscription: Subscription,
        /// False when the record was already cancelled.
        newly_cancelled: bool,
    },
    /// Authentic event that matched no local account or subscription.
    Unmatched,
    /// Authentic event of a type this core does not act on.
    Ignored { event: String },
}

/// Handler for provider webhook deliveries.
///
/// The delivery is verified and parsed through the provider port, then
/// dispatched on event type. Matching is by customer email; events that match
/// nothing locally are acknowledged without error so the provider does not
/// redeliver them.
pub struct ProcessBillingWebhookHandler {
    provider: Arc<dyn BillingProvider>,
    accounts: Arc<dyn AccountStore>,
    subscriptions: Arc<dyn SubscriptionStore>,
}

impl ProcessBillingWebhookHandler {
    pub fn new(
        provider: Arc<dyn BillingProvider>,
        accounts: Arc<dyn AccountStore>,
        subscriptions: Arc<dyn SubscriptionStore>,
    ) -> Self {
        Self {
            provider,
            accounts,
            subscriptions,
        }
    }

    pub async fn handle(
        &self,
        cmd: ProcessBillingWebhookCommand,
    ) -> Result<ProcessBillingWebhookResult, DomainError> {
        // 1. Verify the signature and parse the event
        let event = self
            .provider
            .verify_webhook(&cmd.payload, &cmd.signature)
            .await?;

        // 2. Dispatch on event type
        match event {
            ProviderEvent::SubscriptionCreated {
                customer_email,
                subscription_code,
                next_payment_date,
            } => {
                self.handle_created(&customer_email, subscription_code, next_payment_date)
                    .await
            }
            ProviderEvent::SubscriptionDisabled {
                customer_email,
                amount_minor,
            } => self.handle_disabled(&customer_email, amount_minor).await,
            ProviderEvent::Ignored { event } => {
                tracing::debug!(event = %event, "Ignoring provider event type");
                Ok(ProcessBillingWebhookResult::Ignored { event })
            }
        }
    }

    /// Find the subscription a provider event refers to by customer email.
    ///
    /// Every miss (unparseable email, no account, no subscription) is a
    /// legitimate no-match, not an error.
    async fn match_subscription(
        &self,
        customer_email: &str,
    ) -> Result<Option<Subscription>, DomainError> {
        let email = match Email::new(customer_email) {
            Ok(email) => email,
            Err(_) => {
                tracing::warn!("Webhook customer email failed validation");
                return Ok(None);
            }
        };

        let account = match self.accounts.find_by_email(&email).await? {
            Some(account) => account,
            None => {
                tracing::warn!(email = %email, "Webhook event matched no local account");
                return Ok(None);
            }
        };

        let subscription = match self.subscriptions.find_by_account(&account.id).await? {
            Some(subscription) => subscription,
            None => {
                tracing::warn!(
                    account_id = %account.id,
                    "Webhook event matched an account with no subscription"
                );
                return Ok(None);
            }
        };

        Ok(Some(subscription))
    }

    async fn handle_created(
        &self,
        customer_email: &str,
        subscription_code: String,
        next_payment_date: Option<Timestamp>,
    ) -> Result<ProcessBillingWebhookResult, DomainError> {
        let mut subscription = match self.match_subscription(customer_email).await? {
            Some(subscription) => subscription,
            None => return Ok(ProcessBillingWebhookResult::Unmatched),
        };

        // Convergent: repeating the same event writes the same values
        self.subscriptions
            .record_provider_link(&subscription.id, &subscription_code, next_payment_date)
            .await?;
        subscription.link(subscription_code, next_payment_date);

        tracing::info!(
            account_id = %subscription.account_id,
            subscription_code = %subscription.subscription_code.as_deref().unwrap_or_default(),
            "Linked subscription to provider"
        );

        Ok(ProcessBillingWebhookResult::Linked { subscription })
    }

    async fn handle_disabled(
        &self,
        customer_email: &str,
        amount_minor: Option<i64>,
    ) -> Result<ProcessBillingWebhookResult, DomainError> {
        let mut subscription = match self.match_subscription(customer_email).await? {
            Some(subscription) => subscription,
            None => return Ok(ProcessBillingWebhookResult::Unmatched),
        };

        // The provider already disabled the remote side; record it locally
        // without calling back out. Applies only if not already cancelled.
        let cancelled_at = Timestamp::now();
        let applied = self
            .subscriptions
            .record_cancellation(&subscription.id, cancelled_at, None)
            .await?;

        if applied {
            subscription.record_cancellation(cancelled_at, None);
            tracing::info!(
                account_id = %subscription.account_id,
                amount_minor = ?amount_minor,
                "Cancelled subscription from provider event"
            );
        } else {
            tracing::info!(
                account_id = %subscription.account_id,
                "Provider disable event converged on already-cancelled subscription"
            );
        }

        Ok(ProcessBillingWebhookResult::Cancelled {
            subscription,
            newly_cancelled: applied,
        })
    }
}
