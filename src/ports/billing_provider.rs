//! Billing provider port for the external recurring-billing service.
//!
//! Defines the contract for the provider integration (e.g., Paystack).
//! Implementations handle the remote subscription API calls and webhook
//! delivery verification.
//!
//! # Design
//!
//! - **Provider agnostic**: callers see subscription codes and parsed events,
//!   never raw wire JSON
//! - **Single attempt**: every operation is one network round trip; the
//!   caller owns retry policy
//! - **Minor units on the wire**: amounts cross this boundary as `i64` minor
//!   units and are converted to major units by the caller

use crate::domain::foundation::{DomainError, Timestamp};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for the external recurring-billing provider.
///
/// Covers the four remote operations the synchronizer needs plus webhook
/// verification. Implementations must apply a request timeout and surface
/// `ProviderError` on expiry rather than hang.
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// List the provider's subscriptions matching a plan and a customer.
    ///
    /// `customer` accepts whatever customer handle the provider indexes by
    /// (customer code or email address).
    async fn fetch_subscriptions_by_plan_and_customer(
        &self,
        plan_code: &str,
        customer: &str,
    ) -> Result<Vec<ProviderSubscription>, ProviderError>;

    /// Request a provider-hosted management link for a subscription.
    ///
    /// Safe to re-request; the provider issues a fresh link each time.
    async fn generate_manage_link(&self, subscription_code: &str)
        -> Result<String, ProviderError>;

    /// Disable a subscription on the provider side.
    ///
    /// Requires the subscription's email token, the provider's capability
    /// credential for this operation.
    async fn disable_subscription(
        &self,
        subscription_code: &str,
        email_token: &str,
    ) -> Result<(), ProviderError>;

    /// Move a subscription to a different plan on the provider side.
    ///
    /// Returns the plan code and amount the provider actually applied, which
    /// the caller must treat as authoritative over its own inputs.
    async fn update_subscription(
        &self,
        subscription_code: &str,
        plan_code: &str,
    ) -> Result<ProviderPlanUpdate, ProviderError>;

    /// Verify a raw webhook delivery and parse it into an event.
    ///
    /// # Errors
    ///
    /// - `ProviderError::InvalidSignature` if the signature does not match
    ///   the payload; nothing is parsed in that case
    /// - `ProviderError::MalformedEvent` if the signature matches but the
    ///   payload cannot be understood
    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<ProviderEvent, ProviderError>;
}

/// A subscription as reported by the provider's query API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSubscription {
    /// Provider's subscription code.
    pub subscription_code: String,

    /// Capability token required for a remote disable call.
    pub email_token: Option<String>,

    /// Provider's customer code.
    pub customer_code: Option<String>,

    /// Current amount in minor units.
    pub amount_minor: Option<i64>,

    /// Next scheduled billing date, when the provider reports one.
    pub next_payment_date: Option<Timestamp>,
}

/// Outcome of a provider-side plan change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderPlanUpdate {
    /// Plan code the provider moved the subscription to.
    pub plan_code: String,

    /// New amount in minor units.
    pub amount_minor: i64,
}

/// A verified, parsed webhook delivery.
///
/// Only the two subscription lifecycle events drive local state; everything
/// else that verifies is surfaced as `Ignored` so the caller can acknowledge
/// it without touching the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderEvent {
    /// The provider created a subscription for this customer.
    SubscriptionCreated {
        customer_email: String,
        subscription_code: String,
        next_payment_date: Option<Timestamp>,
    },

    /// The provider disabled (stopped billing) this customer's subscription.
    SubscriptionDisabled {
        customer_email: String,
        amount_minor: Option<i64>,
    },

    /// Authentic delivery of an event type this core does not handle.
    Ignored { event: String },
}

/// Errors from provider operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Request never completed (connect failure, timeout).
    #[error("provider request failed: {0}")]
    Network(String),

    /// Provider answered with a non-success status.
    #[error("provider returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// Provider answered 2xx but the body could not be decoded.
    #[error("provider response could not be decoded: {0}")]
    Decode(String),

    /// Webhook payload failed signature verification.
    #[error("webhook signature mismatch")]
    InvalidSignature,

    /// Webhook payload verified but could not be parsed.
    #[error("webhook payload malformed: {0}")]
    MalformedEvent(String),
}

impl ProviderError {
    /// The provider's HTTP status, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ProviderError> for DomainError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Network(message) => DomainError::provider(message, None),
            ProviderError::Api { status, message } => {
                DomainError::provider(message, Some(status))
            }
            ProviderError::Decode(message) => DomainError::provider(message, None),
            ProviderError::InvalidSignature => DomainError::unauthenticated(),
            ProviderError::MalformedEvent(message) => DomainError::validation("payload", message),
        }
    }
}
