//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Handlers receive already-authenticated actors; the gate is what the HTTP
//! layer uses to turn a bearer token into one.

pub mod gate;
pub mod handlers;

pub use gate::AuthorizationGate;
pub use handlers::{
    // Subscription handlers
    CancelSubscriptionCommand, CancelSubscriptionHandler, CancelSubscriptionResult,
    ChangePlanCommand, ChangePlanHandler, ChangePlanResult,
    ProcessBillingWebhookCommand, ProcessBillingWebhookHandler, ProcessBillingWebhookResult,
    ResolveManageLinkCommand, ResolveManageLinkHandler, ResolveManageLinkResult,
    ResumeSubscriptionCommand, ResumeSubscriptionHandler,
    SuspendSubscriptionCommand, SuspendSubscriptionHandler, SuspendSubscriptionResult,
};
