//! Subscription handlers.
//!
//! Command handlers for subscription lifecycle operations including:
//!
//! ## Commands
//! - Processing billing provider webhooks
//! - Resolving the hosted manage link (with provider identity backfill)
//! - Cancelling subscriptions
//! - Changing plans
//! - Resuming and suspending subscriptions (admin surface)

mod cancel_subscription;
mod change_plan;
mod process_billing_webhook;
mod resolve_manage_link;
mod resume_subscription;
mod suspend_subscription;

// Commands
pub use cancel_subscription::{
    CancelSubscriptionCommand, CancelSubscriptionHandler, CancelSubscriptionResult,
};
pub use change_plan::{ChangePlanCommand, ChangePlanHandler, ChangePlanResult};
pub use process_billing_webhook::{
    ProcessBillingWebhookCommand, ProcessBillingWebhookHandler, ProcessBillingWebhookResult,
};
pub use resolve_manage_link::{
    ResolveManageLinkCommand, ResolveManageLinkHandler, ResolveManageLinkResult,
};
pub use resume_subscription::{ResumeSubscriptionCommand, ResumeSubscriptionHandler};
pub use suspend_subscription::{
    SuspendSubscriptionCommand, SuspendSubscriptionHandler, SuspendSubscriptionResult,
};
