//! Subscription aggregate entity.
//!
//! The locally persisted side of a subscription that also exists at the
//! billing provider. The two systems evolve independently (webhooks, user
//! actions, admin actions), so every mutation here is written to converge:
//! applying the same provider fact twice leaves the record unchanged.
//!
//! # Design Decisions
//!
//! - **One per account**: unique constraint on account_id at the database
//!   level
//! - **Derived state**: lifecycle state is computed from field presence,
//!   never stored alongside it
//! - **Money in major units**: amounts are `Decimal` major currency units;
//!   provider minor units are converted exactly once at the boundary
//! - **Logical termination**: cancelled records keep their history; nothing
//!   is deleted

use crate::domain::foundation::{AccountId, DomainError, PlanId, SubscriptionId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::LifecycleState;

/// Subscription aggregate - local record of a provider subscription.
///
/// # Invariants
///
/// - `account_id` is unique (one subscription per account)
/// - a non-null `cancelled_at` rejects further plan changes
/// - `subscription_code` and `email_token` appear only after a successful
///   provider sync; operations needing them check presence explicitly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Unique identifier for this record.
    pub id: SubscriptionId,

    /// Account that owns this subscription.
    pub account_id: AccountId,

    /// Plan currently billed.
    pub plan_id: PlanId,

    /// Provider subscription code, set by the first successful sync.
    pub subscription_code: Option<String>,

    /// Provider capability token authorizing a remote disable call.
    pub email_token: Option<String>,

    /// Provider customer identifier.
    pub customer_code: Option<String>,

    /// Next provider billing date, when known.
    pub next_billing_date: Option<Timestamp>,

    /// Current amount per interval, in major currency units.
    pub amount: Decimal,

    /// When the subscription was cancelled, if it was.
    pub cancelled_at: Option<Timestamp>,

    /// Reason recorded at cancellation.
    pub cancellation_reason: Option<String>,

    /// When the record was created.
    pub created_at: Timestamp,

    /// When the record was last updated.
    pub updated_at: Timestamp,
}

impl Subscription {
    /// Create a provisional subscription awaiting its first provider sync.
    pub fn provisional(account_id: AccountId, plan_id: PlanId, amount: Decimal) -> Self {
        let now = Timestamp::now();
        Self {
            id: SubscriptionId::new(),
            account_id,
            plan_id,
            subscription_code: None,
            email_token: None,
            customer_code: None,
            next_billing_date: None,
            amount,
            cancelled_at: None,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Derive the lifecycle state from field presence.
    pub fn lifecycle(&self) -> LifecycleState {
        if self.cancelled_at.is_some() {
            LifecycleState::Cancelled
        } else if self.subscription_code.is_some() && self.email_token.is_some() {
            LifecycleState::Linked
        } else {
            LifecycleState::Provisional
        }
    }

    /// Returns true once the cancellation date is set.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled_at.is_some()
    }

    /// Record the provider linkage reported by a created-subscription event.
    ///
    /// Sets only what the event carries: the subscription code and the next
    /// billing date. Convergent; applying the same event again changes
    /// nothing observable.
    pub fn link(&mut self, subscription_code: impl Into<String>, next_billing_date: Option<Timestamp>) {
        self.subscription_code = Some(subscription_code.into());
        self.next_billing_date = next_billing_date;
        self.updated_at = Timestamp::now();
    }

    /// Backfill the full provider identity found by a plan+customer query.
    pub fn backfill_provider_identity(
        &mut self,
        subscription_code: impl Into<String>,
        email_token: impl Into<String>,
        next_billing_date: Option<Timestamp>,
    ) {
        self.subscription_code = Some(subscription_code.into());
        self.email_token = Some(email_token.into());
        if next_billing_date.is_some() {
            self.next_billing_date = next_billing_date;
        }
        self.updated_at = Timestamp::now();
    }

    /// Record cancellation, idempotently.
    ///
    /// Returns `true` if this call set the cancellation date, `false` if the
    /// record was already cancelled (in which case nothing changes, so
    /// repeated disable events converge).
    pub fn record_cancellation(&mut self, at: Timestamp, reason: Option<String>) -> bool {
        if self.cancelled_at.is_some() {
            return false;
        }
        self.cancelled_at = Some(at);
        self.cancellation_reason = reason;
        self.updated_at = Timestamp::now();
        true
    }

    /// Returns the provider linkage needed for a remote disable call.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionFailed` when either the subscription code or the
    /// email token has not been synced yet.
    pub fn require_provider_link(&self) -> Result<(&str, &str), DomainError> {
        match (self.subscription_code.as_deref(), self.email_token.as_deref()) {
            (Some(code), Some(token)) => Ok((code, token)),
            _ => Err(DomainError::precondition_failed(
                "Subscription has not completed provider sync",
            )
            .with_detail("subscription_id", self.id.to_string())),
        }
    }

    /// Returns the provider subscription code, failing when absent.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionFailed` when the code has not been synced yet.
    pub fn require_subscription_code(&self) -> Result<&str, DomainError> {
        self.subscription_code.as_deref().ok_or_else(|| {
            DomainError::precondition_failed("Subscription has no provider subscription code")
                .with_detail("subscription_id", self.id.to_string())
        })
    }

    /// Re-point the plan reference and amount after a provider-confirmed
    /// plan change.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionFailed` on a cancelled subscription.
    pub fn change_plan(&mut self, plan_id: PlanId, amount: Decimal) -> Result<(), DomainError> {
        if self.is_cancelled() {
            return Err(DomainError::precondition_failed(
                "Cancelled subscription cannot change plan",
            )
            .with_detail("subscription_id", self.id.to_string()));
        }
        self.plan_id = plan_id;
        self.amount = amount;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
