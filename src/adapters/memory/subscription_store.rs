//! In-memory subscription store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::foundation::{AccountId, DomainError, PlanId, SubscriptionId, Timestamp};
use crate::domain::subscription::Subscription;
use crate::ports::SubscriptionStore;

/// `SubscriptionStore` over a `Mutex`-held map.
///
/// Every mutation runs under one lock acquisition, giving the same
/// no-partial-writes guarantee the Postgres adapter gets from single
/// conditional UPDATE statements.
#[derive(Default)]
pub struct InMemorySubscriptionStore {
    subscriptions: Mutex<HashMap<SubscriptionId, Subscription>>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn create(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let mut subs = self.subscriptions.lock().unwrap();
        if subs
            .values()
            .any(|s| s.account_id == subscription.account_id)
        {
            return Err(DomainError::validation(
                "account_id",
                "Account already has a subscription",
            ));
        }
        subs.insert(subscription.id, subscription.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &SubscriptionId,
    ) -> Result<Option<Subscription>, DomainError> {
        let subs = self.subscriptions.lock().unwrap();
        Ok(subs.get(id).cloned())
    }

    async fn find_by_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<Subscription>, DomainError> {
        let subs = self.subscriptions.lock().unwrap();
        Ok(subs
            .values()
            .find(|s| &s.account_id == account_id)
            .cloned())
    }

    async fn record_provider_link(
        &self,
        id: &SubscriptionId,
        subscription_code: &str,
        next_billing_date: Option<Timestamp>,
    ) -> Result<(), DomainError> {
        let mut subs = self.subscriptions.lock().unwrap();
        let sub = subs
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("Subscription not found"))?;
        sub.link(subscription_code, next_billing_date);
        Ok(())
    }

    async fn record_provider_identity(
        &self,
        id: &SubscriptionId,
        subscription_code: &str,
        email_token: &str,
        next_billing_date: Option<Timestamp>,
    ) -> Result<(), DomainError> {
        let mut subs = self.subscriptions.lock().unwrap();
        let sub = subs
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("Subscription not found"))?;
        sub.backfill_provider_identity(subscription_code, email_token, next_billing_date);
        Ok(())
    }

    async fn record_cancellation(
        &self,
        id: &SubscriptionId,
        cancelled_at: Timestamp,
        reason: Option<String>,
    ) -> Result<bool, DomainError> {
        let mut subs = self.subscriptions.lock().unwrap();
        match subs.get_mut(id) {
            Some(sub) => Ok(sub.record_cancellation(cancelled_at, reason)),
            None => Ok(false),
        }
    }

    async fn record_plan_change(
        &self,
        id: &SubscriptionId,
        plan_id: &PlanId,
        amount: Decimal,
    ) -> Result<bool, DomainError> {
        let mut subs = self.subscriptions.lock().unwrap();
        match subs.get_mut(id) {
            Some(sub) if !sub.is_cancelled() => {
                sub.plan_id = *plan_id;
                sub.amount = amount;
                sub.updated_at = Timestamp::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
