//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod subscription;

pub use subscription::{
    CancelSubscriptionCommand, CancelSubscriptionHandler, CancelSubscriptionResult,
    ChangePlanCommand, ChangePlanHandler, ChangePlanResult,
    ProcessBillingWebhookCommand, ProcessBillingWebhookHandler, ProcessBillingWebhookResult,
    ResolveManageLinkCommand, ResolveManageLinkHandler, ResolveManageLinkResult,
    ResumeSubscriptionCommand, ResumeSubscriptionHandler,
    SuspendSubscriptionCommand, SuspendSubscriptionHandler, SuspendSubscriptionResult,
};
