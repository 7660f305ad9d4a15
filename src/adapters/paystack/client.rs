//! Paystack billing provider adapter.
//!
//! Implements the `BillingProvider` trait against the Paystack REST API.
//! Covers subscription discovery, manage links, remote disable, plan moves,
//! and webhook verification.
//!
//! # Security
//!
//! - Webhook bodies are HMAC-SHA512 verified in constant time before parsing
//! - The secret key is handled via `secrecy::SecretString` and doubles as the
//!   webhook signing key, as Paystack specifies
//!
//! # Configuration
//!
//! ```ignore
//! let config = PaystackConfig::new(secret_key);
//! let client = PaystackClient::new(config);
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::ports::{
    BillingProvider, ProviderError, ProviderEvent, ProviderPlanUpdate, ProviderSubscription,
};

use super::webhook;

/// Paystack API configuration.
#[derive(Clone)]
pub struct PaystackConfig {
    /// Secret API key (sk_live_... or sk_test_...). Also signs webhooks.
    secret_key: SecretString,

    /// Base URL for the Paystack API (default: https://api.paystack.co).
    api_base_url: String,

    /// Per-request timeout in seconds.
    timeout_secs: u64,
}

impl PaystackConfig {
    /// Create a new Paystack configuration.
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: SecretString::new(secret_key.into()),
            api_base_url: "https://api.paystack.co".to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Paystack billing provider adapter.
///
/// Implements `BillingProvider` for the Paystack REST API.
pub struct PaystackClient {
    config: PaystackConfig,
    http_client: reqwest::Client,
}

impl PaystackClient {
    /// Create a new Paystack client with the given configuration.
    pub fn new(config: PaystackConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    /// Convert a non-2xx response into an API error with the status preserved.
    async fn api_error(operation: &str, response: reqwest::Response) -> ProviderError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        tracing::error!(status, operation, error = %message, "Paystack API call failed");
        ProviderError::Api { status, message }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Wire Types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct ListSubscriptionsResponse {
    data: Vec<WireSubscription>,
}

#[derive(Debug, Deserialize)]
struct WireSubscription {
    subscription_code: String,
    email_token: Option<String>,
    amount: Option<i64>,
    next_payment_date: Option<String>,
    customer: Option<WireCustomer>,
}

#[derive(Debug, Deserialize)]
struct WireCustomer {
    customer_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ManageLinkResponse {
    data: ManageLinkData,
}

#[derive(Debug, Deserialize)]
struct ManageLinkData {
    link: String,
}

#[derive(Debug, Deserialize)]
struct UpdateSubscriptionResponse {
    data: UpdateSubscriptionData,
}

#[derive(Debug, Deserialize)]
struct UpdateSubscriptionData {
    plan: WirePlan,
    amount: i64,
}

#[derive(Debug, Deserialize)]
struct WirePlan {
    plan_code: String,
}

#[async_trait]
impl BillingProvider for PaystackClient {
    async fn fetch_subscriptions_by_plan_and_customer(
        &self,
        plan_code: &str,
        customer: &str,
    ) -> Result<Vec<ProviderSubscription>, ProviderError> {
        let url = self.endpoint("/subscription");

        let response = self
            .http_client
            .get(&url)
            .query(&[("plan", plan_code), ("customer", customer)])
            .bearer_auth(self.config.secret_key.expose_secret())
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error("list_subscriptions", response).await);
        }

        let listing: ListSubscriptionsResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        Ok(listing
            .data
            .into_iter()
            .map(|wire| ProviderSubscription {
                subscription_code: wire.subscription_code,
                email_token: wire.email_token,
                customer_code: wire.customer.and_then(|c| c.customer_code),
                amount_minor: wire.amount,
                next_payment_date: wire
                    .next_payment_date
                    .as_deref()
                    .and_then(webhook::parse_provider_date),
            })
            .collect())
    }

    async fn generate_manage_link(
        &self,
        subscription_code: &str,
    ) -> Result<String, ProviderError> {
        let url = self.endpoint(&format!("/subscription/{}/manage/link", subscription_code));

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(self.config.secret_key.expose_secret())
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error("manage_link", response).await);
        }

        let body: ManageLinkResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        Ok(body.data.link)
    }

    async fn disable_subscription(
        &self,
        subscription_code: &str,
        email_token: &str,
    ) -> Result<(), ProviderError> {
        let url = self.endpoint("/subscription/disable");
        let body = serde_json::json!({
            "code": subscription_code,
            "token": email_token,
        });

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.config.secret_key.expose_secret())
            .timeout(self.timeout())
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error("disable_subscription", response).await);
        }

        Ok(())
    }

    async fn update_subscription(
        &self,
        subscription_code: &str,
        plan_code: &str,
    ) -> Result<ProviderPlanUpdate, ProviderError> {
        let url = self.endpoint(&format!("/subscription/{}", subscription_code));
        let body = serde_json::json!({ "plan": plan_code });

        let response = self
            .http_client
            .put(&url)
            .bearer_auth(self.config.secret_key.expose_secret())
            .timeout(self.timeout())
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error("update_subscription", response).await);
        }

        let update: UpdateSubscriptionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        Ok(ProviderPlanUpdate {
            plan_code: update.data.plan.plan_code,
            amount_minor: update.data.amount,
        })
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<ProviderEvent, ProviderError> {
        let secret = self.config.secret_key.expose_secret().as_bytes();

        if !webhook::verify_signature(secret, payload, signature) {
            tracing::warn!("Webhook signature rejected");
            return Err(ProviderError::InvalidSignature);
        }

        webhook::parse_event(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> PaystackConfig {
        PaystackConfig::new("sk_test_key")
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn config_new_sets_defaults() {
        let config = test_config();
        assert_eq!(config.api_base_url, "https://api.paystack.co");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn config_with_base_url() {
        let config = test_config().with_base_url("http://localhost:8080");
        assert_eq!(config.api_base_url, "http://localhost:8080");
    }

    #[test]
    fn config_with_timeout() {
        let config = test_config().with_timeout_secs(5);
        assert_eq!(config.timeout_secs, 5);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Webhook Verification Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn verify_webhook_accepts_signed_payload() {
        let client = PaystackClient::new(test_config());
        let payload = br#"{"event": "charge.success", "data": {}}"#;
        let signature = webhook::compute_signature(b"sk_test_key", payload);

        let event = client.verify_webhook(payload, &signature).await.unwrap();
        assert_eq!(
            event,
            ProviderEvent::Ignored {
                event: "charge.success".to_string()
            }
        );
    }

    #[tokio::test]
    async fn verify_webhook_rejects_bad_signature() {
        let client = PaystackClient::new(test_config());
        let payload = br#"{"event": "charge.success", "data": {}}"#;
        let signature = webhook::compute_signature(b"some_other_key", payload);

        let result = client.verify_webhook(payload, &signature).await;
        assert_eq!(result, Err(ProviderError::InvalidSignature));
    }

    #[tokio::test]
    async fn verify_webhook_surfaces_malformed_payload() {
        let client = PaystackClient::new(test_config());
        let payload = b"not json";
        let signature = webhook::compute_signature(b"sk_test_key", payload);

        let result = client.verify_webhook(payload, &signature).await;
        assert!(matches!(result, Err(ProviderError::MalformedEvent(_))));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Wire Type Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn deserializes_subscription_listing() {
        let body = r#"{
            "status": true,
            "message": "Subscriptions retrieved",
            "data": [
                {
                    "subscription_code": "SUB_vsyqdmlzble3uii",
                    "email_token": "d7gofp6yppn3qz7",
                    "amount": 50000,
                    "next_payment_date": "2026-09-28T07:00:00.000Z",
                    "customer": { "customer_code": "CUS_xnxdt6s1zg1f4nx" }
                }
            ]
        }"#;

        let listing: ListSubscriptionsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(listing.data.len(), 1);
        assert_eq!(listing.data[0].subscription_code, "SUB_vsyqdmlzble3uii");
        assert_eq!(listing.data[0].email_token.as_deref(), Some("d7gofp6yppn3qz7"));
        assert_eq!(listing.data[0].amount, Some(50000));
    }

    #[test]
    fn deserializes_manage_link() {
        let body = r#"{"status": true, "data": {"link": "https://paystack.com/manage/abc"}}"#;
        let response: ManageLinkResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.data.link, "https://paystack.com/manage/abc");
    }

    #[test]
    fn deserializes_plan_update() {
        let body = r#"{
            "status": true,
            "data": {
                "plan": { "plan_code": "PLN_yearly", "name": "Yearly" },
                "amount": 500000
            }
        }"#;

        let response: UpdateSubscriptionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.data.plan.plan_code, "PLN_yearly");
        assert_eq!(response.data.amount, 500000);
    }
}
