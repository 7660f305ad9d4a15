//! Mock billing provider for testing.
//!
//! Provides a configurable mock implementation of `BillingProvider` for unit
//! and integration tests. Supports:
//! - Pre-configured responses
//! - Error injection
//! - Call tracking
//! - Webhook event simulation

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::foundation::Timestamp;
use crate::ports::{
    BillingProvider, ProviderError, ProviderEvent, ProviderPlanUpdate, ProviderSubscription,
};

use super::webhook;

/// Mock billing provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockBillingProvider::new();
///
/// // Configure responses
/// mock.set_fetch_results(vec![provider_subscription]);
///
/// // Inject errors
/// mock.set_error(ProviderError::Network("connection reset".into()));
///
/// // Use in tests
/// let result = mock.generate_manage_link("SUB_abc").await;
/// ```
#[derive(Default)]
pub struct MockBillingProvider {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockState {
    /// Subscriptions returned by every fetch.
    fetch_results: Vec<ProviderSubscription>,

    /// Next manage link to return.
    next_manage_link: Option<String>,

    /// Next plan update result to return.
    next_plan_update: Option<ProviderPlanUpdate>,

    /// Event to return on webhook verification.
    next_event: Option<ProviderEvent>,

    /// Error to return on next call.
    next_error: Option<ProviderError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, ProviderError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,

    /// Webhook verification behavior.
    webhook_verify_mode: WebhookVerifyMode,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

/// How to handle webhook verification.
#[derive(Default, Clone)]
enum WebhookVerifyMode {
    /// Accept any payload and return the configured or parsed event.
    #[default]
    AcceptAll,

    /// Require an exact signature match.
    RequireSignature(String),

    /// Always fail verification.
    AlwaysFail,
}

impl MockBillingProvider {
    /// Create a new mock provider with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that fails all webhook verifications.
    pub fn rejecting_webhooks() -> Self {
        let mock = Self::new();
        mock.inner.lock().unwrap().webhook_verify_mode = WebhookVerifyMode::AlwaysFail;
        mock
    }

    /// Create a mock that only accepts the given webhook signature.
    pub fn requiring_signature(signature: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.inner.lock().unwrap().webhook_verify_mode =
            WebhookVerifyMode::RequireSignature(signature.into());
        mock
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Set the subscriptions returned by `fetch_subscriptions_by_plan_and_customer`.
    pub fn set_fetch_results(&self, subscriptions: Vec<ProviderSubscription>) {
        self.inner.lock().unwrap().fetch_results = subscriptions;
    }

    /// Set the link to return on the next `generate_manage_link` call.
    pub fn set_manage_link(&self, link: impl Into<String>) {
        self.inner.lock().unwrap().next_manage_link = Some(link.into());
    }

    /// Set the result to return on the next `update_subscription` call.
    pub fn set_plan_update(&self, update: ProviderPlanUpdate) {
        self.inner.lock().unwrap().next_plan_update = Some(update);
    }

    /// Set the event to return on webhook verification.
    pub fn set_event(&self, event: ProviderEvent) {
        self.inner.lock().unwrap().next_event = Some(event);
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: ProviderError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: ProviderError) {
        self.inner
            .lock()
            .unwrap()
            .method_errors
            .insert(method.to_string(), error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.inner.lock().unwrap();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    /// Get all recorded method calls.
    pub fn calls(&self) -> Vec<MethodCall> {
        self.inner.lock().unwrap().call_log.clone()
    }

    /// Check if a method was called.
    pub fn was_called(&self, method: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .any(|c| c.method == method)
    }

    /// Get count of calls to a method.
    pub fn call_count(&self, method: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().call_log.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.inner.lock().unwrap().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), ProviderError> {
        let mut state = self.inner.lock().unwrap();

        // Check method-specific error first
        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        // Check global error (consumes it)
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }
}

impl Clone for MockBillingProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl BillingProvider for MockBillingProvider {
    async fn fetch_subscriptions_by_plan_and_customer(
        &self,
        plan_code: &str,
        customer: &str,
    ) -> Result<Vec<ProviderSubscription>, ProviderError> {
        self.record_call(
            "fetch_subscriptions_by_plan_and_customer",
            vec![plan_code.to_string(), customer.to_string()],
        );
        self.check_error("fetch_subscriptions_by_plan_and_customer")?;

        let state = self.inner.lock().unwrap();
        Ok(state.fetch_results.clone())
    }

    async fn generate_manage_link(
        &self,
        subscription_code: &str,
    ) -> Result<String, ProviderError> {
        self.record_call("generate_manage_link", vec![subscription_code.to_string()]);
        self.check_error("generate_manage_link")?;

        let mut state = self.inner.lock().unwrap();

        let link = state
            .next_manage_link
            .take()
            .unwrap_or_else(|| format!("https://paystack.com/manage/mock/{}", subscription_code));

        Ok(link)
    }

    async fn disable_subscription(
        &self,
        subscription_code: &str,
        email_token: &str,
    ) -> Result<(), ProviderError> {
        self.record_call(
            "disable_subscription",
            vec![subscription_code.to_string(), email_token.to_string()],
        );
        self.check_error("disable_subscription")?;

        Ok(())
    }

    async fn update_subscription(
        &self,
        subscription_code: &str,
        plan_code: &str,
    ) -> Result<ProviderPlanUpdate, ProviderError> {
        self.record_call(
            "update_subscription",
            vec![subscription_code.to_string(), plan_code.to_string()],
        );
        self.check_error("update_subscription")?;

        let mut state = self.inner.lock().unwrap();

        let update = state
            .next_plan_update
            .take()
            .unwrap_or_else(|| ProviderPlanUpdate {
                plan_code: plan_code.to_string(),
                amount_minor: 500_000,
            });

        Ok(update)
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<ProviderEvent, ProviderError> {
        self.record_call(
            "verify_webhook",
            vec![
                String::from_utf8_lossy(payload).chars().take(50).collect(),
                signature.chars().take(20).collect(),
            ],
        );
        self.check_error("verify_webhook")?;

        let state = self.inner.lock().unwrap();

        // Check verification mode
        match &state.webhook_verify_mode {
            WebhookVerifyMode::AcceptAll => {}
            WebhookVerifyMode::RequireSignature(required) => {
                if signature != required {
                    return Err(ProviderError::InvalidSignature);
                }
            }
            WebhookVerifyMode::AlwaysFail => {
                return Err(ProviderError::InvalidSignature);
            }
        }

        // Return configured event or parse the payload like the real adapter
        if let Some(event) = &state.next_event {
            return Ok(event.clone());
        }

        webhook::parse_event(payload)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Test Helpers
// ════════════════════════════════════════════════════════════════════════════════

impl MockBillingProvider {
    /// Create a mock with one fetchable linked subscription.
    pub fn with_provider_subscription(subscription_code: &str, email_token: &str) -> Self {
        let mock = Self::new();
        mock.set_fetch_results(vec![ProviderSubscription {
            subscription_code: subscription_code.to_string(),
            email_token: Some(email_token.to_string()),
            customer_code: Some("CUS_mock".to_string()),
            amount_minor: Some(500_000),
            next_payment_date: Some(Timestamp::now().add_days(30)),
        }]);
        mock
    }

    /// Create a subscription activation event.
    pub fn subscription_created_event(email: &str, subscription_code: &str) -> ProviderEvent {
        ProviderEvent::SubscriptionCreated {
            customer_email: email.to_string(),
            subscription_code: subscription_code.to_string(),
            next_payment_date: Some(Timestamp::now().add_days(30)),
        }
    }

    /// Create a subscription disable event.
    pub fn subscription_disabled_event(email: &str, amount_minor: Option<i64>) -> ProviderEvent {
        ProviderEvent::SubscriptionDisabled {
            customer_email: email.to_string(),
            amount_minor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ════════════════════════════════════════════════════════════════════════════
    // Basic Operation Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn fetch_returns_configured_subscriptions() {
        let mock = MockBillingProvider::with_provider_subscription("SUB_abc", "token_xyz");

        let results = mock
            .fetch_subscriptions_by_plan_and_customer("PLN_pro", "bolu@example.com")
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].subscription_code, "SUB_abc");
        assert_eq!(results[0].email_token.as_deref(), Some("token_xyz"));
    }

    #[tokio::test]
    async fn fetch_defaults_to_empty() {
        let mock = MockBillingProvider::new();

        let results = mock
            .fetch_subscriptions_by_plan_and_customer("PLN_pro", "bolu@example.com")
            .await
            .unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn manage_link_defaults_to_generated_url() {
        let mock = MockBillingProvider::new();

        let link = mock.generate_manage_link("SUB_abc").await.unwrap();

        assert_eq!(link, "https://paystack.com/manage/mock/SUB_abc");
    }

    #[tokio::test]
    async fn manage_link_returns_configured() {
        let mock = MockBillingProvider::new();
        mock.set_manage_link("https://paystack.com/manage/custom");

        let link = mock.generate_manage_link("SUB_abc").await.unwrap();

        assert_eq!(link, "https://paystack.com/manage/custom");
    }

    #[tokio::test]
    async fn update_subscription_echoes_requested_plan_by_default() {
        let mock = MockBillingProvider::new();

        let update = mock.update_subscription("SUB_abc", "PLN_yearly").await.unwrap();

        assert_eq!(update.plan_code, "PLN_yearly");
        assert_eq!(update.amount_minor, 500_000);
    }

    #[tokio::test]
    async fn update_subscription_returns_configured() {
        let mock = MockBillingProvider::new();
        mock.set_plan_update(ProviderPlanUpdate {
            plan_code: "PLN_other".to_string(),
            amount_minor: 1_200_000,
        });

        let update = mock.update_subscription("SUB_abc", "PLN_yearly").await.unwrap();

        assert_eq!(update.plan_code, "PLN_other");
        assert_eq!(update.amount_minor, 1_200_000);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Error Injection Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn set_error_fails_next_call_only() {
        let mock = MockBillingProvider::new();
        mock.set_error(ProviderError::Network("connection reset".to_string()));

        let first = mock.generate_manage_link("SUB_abc").await;
        assert!(matches!(first, Err(ProviderError::Network(_))));

        let second = mock.generate_manage_link("SUB_abc").await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn set_method_error_only_affects_method() {
        let mock = MockBillingProvider::new();
        mock.set_method_error(
            "disable_subscription",
            ProviderError::Api {
                status: 502,
                message: "upstream down".to_string(),
            },
        );

        assert!(mock.generate_manage_link("SUB_abc").await.is_ok());

        let result = mock.disable_subscription("SUB_abc", "token").await;
        assert!(matches!(result, Err(ProviderError::Api { status: 502, .. })));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn tracks_method_calls() {
        let mock = MockBillingProvider::new();

        mock.disable_subscription("SUB_abc", "token_xyz").await.unwrap();

        assert!(mock.was_called("disable_subscription"));
        assert_eq!(mock.call_count("disable_subscription"), 1);
        assert!(!mock.was_called("generate_manage_link"));
    }

    #[tokio::test]
    async fn call_log_contains_arguments() {
        let mock = MockBillingProvider::new();

        mock.fetch_subscriptions_by_plan_and_customer("PLN_pro", "CUS_123")
            .await
            .unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].args.contains(&"PLN_pro".to_string()));
        assert!(calls[0].args.contains(&"CUS_123".to_string()));
    }

    #[tokio::test]
    async fn clear_calls_resets_log() {
        let mock = MockBillingProvider::new();

        mock.generate_manage_link("SUB_abc").await.unwrap();
        assert_eq!(mock.call_count("generate_manage_link"), 1);

        mock.clear_calls();

        assert_eq!(mock.call_count("generate_manage_link"), 0);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Webhook Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn verify_webhook_returns_configured_event() {
        let mock = MockBillingProvider::new();
        let event = MockBillingProvider::subscription_created_event("bolu@example.com", "SUB_abc");
        mock.set_event(event.clone());

        let result = mock.verify_webhook(b"{}", "signature").await.unwrap();

        assert_eq!(result, event);
    }

    #[tokio::test]
    async fn verify_webhook_parses_payload_when_no_event_set() {
        let mock = MockBillingProvider::new();

        let payload = br#"{"event": "invoice.update", "data": {}}"#;
        let result = mock.verify_webhook(payload, "sig").await.unwrap();

        assert_eq!(
            result,
            ProviderEvent::Ignored {
                event: "invoice.update".to_string()
            }
        );
    }

    #[tokio::test]
    async fn rejecting_webhooks_fails_verification() {
        let mock = MockBillingProvider::rejecting_webhooks();

        let result = mock.verify_webhook(b"{}", "signature").await;

        assert_eq!(result, Err(ProviderError::InvalidSignature));
    }

    #[tokio::test]
    async fn requiring_signature_checks_exact_match() {
        let mock = MockBillingProvider::requiring_signature("expected-sig");
        mock.set_event(MockBillingProvider::subscription_disabled_event(
            "bolu@example.com",
            Some(50000),
        ));

        let rejected = mock.verify_webhook(b"{}", "wrong-sig").await;
        assert_eq!(rejected, Err(ProviderError::InvalidSignature));

        let accepted = mock.verify_webhook(b"{}", "expected-sig").await;
        assert!(accepted.is_ok());
    }
}
