//! Axum router configuration for subscription endpoints.
//!
//! This module defines the route structure for subscription-related API
//! endpoints and wires them to their corresponding handlers.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::adapters::http::middleware::{auth_middleware, AuthState};

use super::handlers::{
    cancel_subscription, change_plan, get_manage_link, handle_billing_webhook,
    resume_subscription, suspend_subscription, SubscriptionAppState,
};

/// Create the subscription API router.
///
/// # Routes
///
/// ## Subscriber Endpoints (require authentication)
/// - `GET /manage-link` - Resolve the provider manage link for the caller
/// - `POST /cancel` - Cancel a subscription (owner or superadmin)
/// - `POST /change-plan` - Move a subscription onto a different plan
///
/// ## Admin Endpoints (require a staff role; superadmin enforced in handlers)
/// - `POST /resume` - Resume a subscription (inert)
/// - `POST /suspend` - Suspend a subscription (inert)
pub fn subscription_routes() -> Router<SubscriptionAppState> {
    Router::new()
        // Subscriber endpoints
        .route("/manage-link", get(get_manage_link))
        .route("/cancel", post(cancel_subscription))
        .route("/change-plan", post(change_plan))
        // Admin endpoints
        .route("/resume", post(resume_subscription))
        .route("/suspend", post(suspend_subscription))
}

/// Create the billing webhook router.
///
/// This is separate from the subscription routes because webhook deliveries
/// carry no cookie; they are authenticated by signature alone.
///
/// # Routes
/// - `POST /billing` - Handle billing provider webhooks
pub fn webhook_routes() -> Router<SubscriptionAppState> {
    Router::new().route("/billing", post(handle_billing_webhook))
}

/// Create the complete API router with the auth middleware applied.
///
/// The cookie middleware wraps only the subscription routes; the webhook
/// routes stay outside it so deliveries are never challenged for a cookie.
///
/// # Example
///
/// ```ignore
/// use crate::adapters::http::subscription::{api_router, SubscriptionAppState};
///
/// let app = api_router(state, gate);
/// axum::serve(listener, app).await?;
/// ```
pub fn api_router(state: SubscriptionAppState, gate: AuthState) -> Router {
    Router::new()
        .nest(
            "/api/subscription",
            subscription_routes().layer(middleware::from_fn_with_state(gate, auth_middleware)),
        )
        .nest("/api/webhooks", webhook_routes())
        .with_state(state)
}
