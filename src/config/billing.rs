//! Billing provider configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Billing provider configuration (Paystack)
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Paystack secret key
    #[serde(default = "default_secret_key")]
    pub secret_key: SecretString,

    /// Paystack API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl BillingConfig {
    /// Check if using a Paystack test key
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.expose_secret().starts_with("sk_test_")
    }

    /// Validate billing configuration
    ///
    /// In production the API base URL must use HTTPS. Development allows
    /// plain HTTP so the client can point at a local stub server.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let key = self.secret_key.expose_secret();
        if key.is_empty() {
            return Err(ValidationError::MissingRequired(
                "MEMBERLINE__BILLING__SECRET_KEY",
            ));
        }
        if !key.starts_with("sk_") {
            return Err(ValidationError::InvalidValue {
                field: "billing.secret_key",
                reason: "expected a Paystack secret key (sk_ prefix)",
            });
        }
        if self.base_url.is_empty() {
            return Err(ValidationError::MissingRequired(
                "MEMBERLINE__BILLING__BASE_URL",
            ));
        }
        if *environment == Environment::Production && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidValue {
                field: "billing.base_url",
                reason: "must use HTTPS in production",
            });
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidValue {
                field: "billing.timeout_secs",
                reason: "must be between 1 and 300",
            });
        }
        Ok(())
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            secret_key: default_secret_key(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_secret_key() -> SecretString {
    SecretString::new(String::new())
}

fn default_base_url() -> String {
    "https://api.paystack.co".to_string()
}

fn default_timeout() -> u64 {
    30
}
