//! HTTP adapter for subscription endpoints.
//!
//! Exposes the subscription lifecycle via REST API:
//! - `GET /api/subscription/manage-link` - Resolve the provider manage link
//! - `POST /api/subscription/cancel` - Cancel a subscription
//! - `POST /api/subscription/change-plan` - Move onto a different plan
//! - `POST /api/subscription/resume` - Resume (admin surface, inert)
//! - `POST /api/subscription/suspend` - Suspend (admin surface, inert)
//! - `POST /api/webhooks/billing` - Handle billing provider webhooks

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{SubscriptionApiError, SubscriptionAppState, SubscriptionHandlers};
pub use routes::{api_router, subscription_routes, webhook_routes};
