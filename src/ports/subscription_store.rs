//! Subscription store port.
//!
//! Defines the contract for persisting Subscription records and for the
//! intent-named mutations the synchronizer applies to them.
//!
//! # Design
//!
//! - **One row, one statement**: every mutation is a single atomic
//!   update-by-id so a webhook and a user action racing on the same record
//!   cannot interleave partial writes
//! - **Conditional writes report back**: cancellation and plan change apply
//!   only while the record is uncancelled, and return whether a row changed
//!   so the caller can tell "applied" from "lost the race"
//! - **One subscription per account**: lookups by owning account return at
//!   most one record

use crate::domain::foundation::{AccountId, DomainError, PlanId, SubscriptionId, Timestamp};
use crate::domain::subscription::Subscription;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Store port for Subscription persistence.
///
/// "Found nothing" is `Ok(None)`; only store failures are errors.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Persist a new subscription record.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the account already has a subscription
    /// - `PersistenceError` on store failure
    async fn create(&self, subscription: &Subscription) -> Result<(), DomainError>;

    /// Find a subscription by its ID.
    async fn find_by_id(&self, id: &SubscriptionId)
        -> Result<Option<Subscription>, DomainError>;

    /// Find the subscription owned by an account.
    async fn find_by_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<Subscription>, DomainError>;

    /// Record the provider linkage carried by a created-subscription event:
    /// subscription code and next billing date.
    ///
    /// Unconditional and convergent; re-applying the same event rewrites the
    /// same values.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no record with this id exists
    async fn record_provider_link(
        &self,
        id: &SubscriptionId,
        subscription_code: &str,
        next_billing_date: Option<Timestamp>,
    ) -> Result<(), DomainError>;

    /// Record the full provider identity found by a plan+customer query:
    /// subscription code, email token, and (when reported) next billing date.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no record with this id exists
    async fn record_provider_identity(
        &self,
        id: &SubscriptionId,
        subscription_code: &str,
        email_token: &str,
        next_billing_date: Option<Timestamp>,
    ) -> Result<(), DomainError>;

    /// Set the cancellation date and reason, only where no cancellation date
    /// is present yet.
    ///
    /// Returns `true` if this call cancelled the record, `false` if it was
    /// already cancelled (the first cancellation's date and reason stand) or
    /// the record does not exist.
    async fn record_cancellation(
        &self,
        id: &SubscriptionId,
        cancelled_at: Timestamp,
        reason: Option<String>,
    ) -> Result<bool, DomainError>;

    /// Re-point the plan reference and amount, only where no cancellation
    /// date is present.
    ///
    /// Returns `true` if the change applied, `false` if the record was
    /// cancelled in the meantime or does not exist.
    async fn record_plan_change(
        &self,
        id: &SubscriptionId,
        plan_id: &PlanId,
        amount: Decimal,
    ) -> Result<bool, DomainError>;
}
