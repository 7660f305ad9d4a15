//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Authentication configuration (access token signing)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign and verify access tokens
    #[serde(default = "default_token_secret")]
    pub token_secret: SecretString,

    /// Access token lifetime in seconds
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
}

impl AuthConfig {
    /// Validate authentication configuration
    ///
    /// In production the signing secret must be at least 32 bytes.
    /// Development allows short throwaway secrets.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let secret = self.token_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired(
                "MEMBERLINE__AUTH__TOKEN_SECRET",
            ));
        }
        if *environment == Environment::Production && secret.len() < 32 {
            return Err(ValidationError::InvalidValue {
                field: "auth.token_secret",
                reason: "must be at least 32 bytes in production",
            });
        }
        if self.token_ttl_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "auth.token_ttl_secs",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: default_token_secret(),
            token_ttl_secs: default_token_ttl(),
        }
    }
}

fn default_token_secret() -> SecretString {
    SecretString::new(String::new())
}

fn default_token_ttl() -> u64 {
    86400
}
