//! HTTP DTOs (Data Transfer Objects) for subscription endpoints.
//!
//! These types define the JSON request/response structure for the
//! subscription API. They serve as the boundary between HTTP and the
//! application layer.

use crate::domain::foundation::{AccountId, PlanId};
use crate::domain::plan::{BillingInterval, Plan};
use crate::domain::subscription::{LifecycleState, Subscription};
use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to cancel a subscription.
#[derive(Debug, Clone, Deserialize)]
pub struct CancelSubscriptionRequest {
    /// Free-text reason recorded with the cancellation.
    #[serde(default)]
    pub reason: Option<String>,
    /// Target account (superadmin only). Defaults to the caller's account.
    #[serde(default)]
    pub account_id: Option<AccountId>,
}

/// Request to move a subscription onto a different plan.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangePlanRequest {
    /// The plan to move to.
    pub plan_id: PlanId,
    /// Target account (superadmin only). Defaults to the caller's account.
    #[serde(default)]
    pub account_id: Option<AccountId>,
}

/// Request for the resume and suspend endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetAccountRequest {
    /// Target account. Defaults to the caller's account.
    #[serde(default)]
    pub account_id: Option<AccountId>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Subscription record view for API responses.
///
/// The provider email token never leaves the server; it is a capability
/// credential, not subscription data.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionResponse {
    /// Subscription ID.
    pub id: String,
    /// Owning account ID.
    pub account_id: String,
    /// Current plan ID.
    pub plan_id: String,
    /// Derived lifecycle state.
    pub lifecycle: LifecycleState,
    /// Provider subscription code, once linked.
    pub subscription_code: Option<String>,
    /// Provider customer code, when known.
    pub customer_code: Option<String>,
    /// Next billing date (ISO 8601), when the provider has reported one.
    pub next_billing_date: Option<String>,
    /// Price per billing period, in major units.
    pub amount: String,
    /// When the subscription was cancelled (ISO 8601).
    pub cancelled_at: Option<String>,
    /// Reason recorded with the cancellation.
    pub cancellation_reason: Option<String>,
    /// When the subscription was created (ISO 8601).
    pub created_at: String,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(subscription: Subscription) -> Self {
        let lifecycle = subscription.lifecycle();
        Self {
            id: subscription.id.to_string(),
            account_id: subscription.account_id.to_string(),
            plan_id: subscription.plan_id.to_string(),
            lifecycle,
            subscription_code: subscription.subscription_code,
            customer_code: subscription.customer_code,
            next_billing_date: subscription
                .next_billing_date
                .map(|t| t.as_datetime().to_rfc3339()),
            amount: subscription.amount.to_string(),
            cancelled_at: subscription
                .cancelled_at
                .map(|t| t.as_datetime().to_rfc3339()),
            cancellation_reason: subscription.cancellation_reason,
            created_at: subscription.created_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Plan view for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    /// Plan ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Price per billing period, in major units.
    pub price: String,
    /// Billing interval.
    pub interval: BillingInterval,
    /// Feature descriptions shown to subscribers.
    pub features: Vec<String>,
}

impl From<Plan> for PlanResponse {
    fn from(plan: Plan) -> Self {
        Self {
            id: plan.id.to_string(),
            name: plan.name,
            price: plan.price.to_string(),
            interval: plan.interval,
            features: plan.features,
        }
    }
}

/// Response for manage-link resolution.
#[derive(Debug, Clone, Serialize)]
pub struct ManageLinkResponse {
    /// Provider-hosted self-service URL.
    pub link: String,
    /// The subscription backing the link.
    pub subscription: SubscriptionResponse,
}

/// Response for a plan change.
#[derive(Debug, Clone, Serialize)]
pub struct ChangePlanResponse {
    /// The subscription after the change.
    pub subscription: SubscriptionResponse,
    /// The plan the subscription now points at.
    pub plan: PlanResponse,
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Response DTO
// ════════════════════════════════════════════════════════════════════════════════

/// Standard error response for API errors.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Error code for programmatic handling.
    pub code: String,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}
