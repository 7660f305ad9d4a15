//! HTTP handlers for subscription endpoints.
//!
//! These handlers connect Axum routes to application layer command handlers.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::middleware::{RequireAccount, RequireAdmin};
use crate::application::handlers::subscription::{
    CancelSubscriptionCommand, CancelSubscriptionHandler, ChangePlanCommand, ChangePlanHandler,
    ProcessBillingWebhookCommand, ProcessBillingWebhookHandler, ResolveManageLinkCommand,
    ResolveManageLinkHandler, ResumeSubscriptionCommand, ResumeSubscriptionHandler,
    SuspendSubscriptionCommand, SuspendSubscriptionHandler,
};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{AccountStore, BillingProvider, PlanStore, SubscriptionStore};

use super::dto::{
    CancelSubscriptionRequest, ChangePlanRequest, ChangePlanResponse, ErrorResponse,
    ManageLinkResponse, SubscriptionResponse, TargetAccountRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// The subscription command handlers, grouped for injection into routes.
///
/// Built once at startup over the shared ports. Every handler is stateless
/// beyond its port references, so the group is shared behind one `Arc`.
pub struct SubscriptionHandlers {
    pub resolve_manage_link: ResolveManageLinkHandler,
    pub cancel_subscription: CancelSubscriptionHandler,
    pub change_plan: ChangePlanHandler,
    pub process_billing_webhook: ProcessBillingWebhookHandler,
    pub resume_subscription: ResumeSubscriptionHandler,
    pub suspend_subscription: SuspendSubscriptionHandler,
}

impl SubscriptionHandlers {
    pub fn new(
        provider: Arc<dyn BillingProvider>,
        accounts: Arc<dyn AccountStore>,
        plans: Arc<dyn PlanStore>,
        subscriptions: Arc<dyn SubscriptionStore>,
    ) -> Self {
        Self {
            resolve_manage_link: ResolveManageLinkHandler::new(
                provider.clone(),
                plans.clone(),
                subscriptions.clone(),
            ),
            cancel_subscription: CancelSubscriptionHandler::new(
                provider.clone(),
                subscriptions.clone(),
            ),
            change_plan: ChangePlanHandler::new(provider.clone(), plans, subscriptions.clone()),
            process_billing_webhook: ProcessBillingWebhookHandler::new(
                provider,
                accounts,
                subscriptions.clone(),
            ),
            resume_subscription: ResumeSubscriptionHandler::new(subscriptions.clone()),
            suspend_subscription: SuspendSubscriptionHandler::new(subscriptions),
        }
    }
}

/// Shared application state for subscription routes.
///
/// This struct is cloned for each request and contains Arc-wrapped
/// dependencies for efficient sharing across handlers.
#[derive(Clone)]
pub struct SubscriptionAppState {
    pub handlers: Arc<SubscriptionHandlers>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Authenticated Routes
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/subscription/manage-link - Resolve the provider manage link for the caller
pub async fn get_manage_link(
    State(state): State<SubscriptionAppState>,
    RequireAccount(account): RequireAccount,
) -> Result<impl IntoResponse, SubscriptionApiError> {
    let cmd = ResolveManageLinkCommand { actor: account };

    let result = state.handlers.resolve_manage_link.handle(cmd).await?;

    let response = ManageLinkResponse {
        link: result.link,
        subscription: result.subscription.into(),
    };

    Ok(Json(response))
}

/// POST /api/subscription/cancel - Cancel the caller's (or a target's) subscription
pub async fn cancel_subscription(
    State(state): State<SubscriptionAppState>,
    RequireAccount(account): RequireAccount,
    Json(request): Json<CancelSubscriptionRequest>,
) -> Result<impl IntoResponse, SubscriptionApiError> {
    let cmd = CancelSubscriptionCommand {
        actor: account,
        account_id: request.account_id,
        reason: request.reason,
    };

    let result = state.handlers.cancel_subscription.handle(cmd).await?;

    Ok(Json(SubscriptionResponse::from(result.subscription)))
}

/// POST /api/subscription/change-plan - Move a subscription onto a different plan
pub async fn change_plan(
    State(state): State<SubscriptionAppState>,
    RequireAccount(account): RequireAccount,
    Json(request): Json<ChangePlanRequest>,
) -> Result<impl IntoResponse, SubscriptionApiError> {
    let cmd = ChangePlanCommand {
        actor: account,
        account_id: request.account_id,
        plan_id: request.plan_id,
    };

    let result = state.handlers.change_plan.handle(cmd).await?;

    let response = ChangePlanResponse {
        subscription: result.subscription.into(),
        plan: result.plan.into(),
    };

    Ok(Json(response))
}

/// POST /api/subscription/resume - Resume a subscription (admin surface, inert)
pub async fn resume_subscription(
    State(state): State<SubscriptionAppState>,
    RequireAdmin(account): RequireAdmin,
    Json(request): Json<TargetAccountRequest>,
) -> Result<impl IntoResponse, SubscriptionApiError> {
    let cmd = ResumeSubscriptionCommand {
        actor: account,
        account_id: request.account_id,
    };

    state.handlers.resume_subscription.handle(cmd).await?;

    Ok(StatusCode::OK)
}

/// POST /api/subscription/suspend - Suspend a subscription (admin surface, inert)
pub async fn suspend_subscription(
    State(state): State<SubscriptionAppState>,
    RequireAdmin(account): RequireAdmin,
    Json(request): Json<TargetAccountRequest>,
) -> Result<impl IntoResponse, SubscriptionApiError> {
    let cmd = SuspendSubscriptionCommand {
        actor: account,
        account_id: request.account_id,
    };

    let result = state.handlers.suspend_subscription.handle(cmd).await?;

    Ok(Json(SubscriptionResponse::from(result.subscription)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Webhook Route (no cookie auth; signature-gated)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/webhooks/billing - Handle billing provider webhook deliveries
///
/// Handled and ignored events alike answer `200 OK` so the provider stops
/// redelivering them; only a bad signature or a malformed payload is non-2xx.
pub async fn handle_billing_webhook(
    State(state): State<SubscriptionAppState>,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, SubscriptionApiError> {
    // A missing signature header fails verification the same way a wrong one does
    let signature = headers
        .get("x-paystack-signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let cmd = ProcessBillingWebhookCommand {
        payload: body.to_vec(),
        signature,
    };

    state.handlers.process_billing_webhook.handle(cmd).await?;

    Ok(StatusCode::OK)
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
pub struct SubscriptionApiError(DomainError);

impl From<DomainError> for SubscriptionApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for SubscriptionApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.0.code {
            ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::PreconditionFailed => StatusCode::PRECONDITION_FAILED,
            ErrorCode::ProviderError => StatusCode::BAD_GATEWAY,
            ErrorCode::PersistenceError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::NotImplemented => StatusCode::NOT_IMPLEMENTED,
        };

        if status.is_server_error() {
            tracing::error!(code = %self.0.code, "Request failed: {}", self.0);
        }

        // Provider and persistence detail stays on the server
        let message = match self.0.code {
            ErrorCode::ProviderError => "Billing provider request failed".to_string(),
            ErrorCode::PersistenceError => "Internal error".to_string(),
            _ => self.0.message,
        };

        let body = ErrorResponse::new(message, self.0.code.to_string());
        (status, Json(body)).into_response()
    }
}
