//! JWT adapter for signed access tokens.
//!
//! Implements the `TokenAuthority` port with HS256 tokens signed by a
//! process-held secret. Tokens carry the account id as `sub` plus `iat` and
//! `exp`; role and status are deliberately absent so they are always re-read
//! from the account store at request time.
//!
//! # Security
//!
//! - **Algorithm pinning**: verification accepts HS256 only. A token whose
//!   header names any other algorithm (including `none`) is rejected
//!   regardless of its signature.
//! - **Expiry**: `exp` is required and checked with zero leeway.
//! - **Collapsed failures**: every rejection path verifies to `None` so
//!   callers cannot distinguish a forged token from an expired one.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AccountId, DomainError, Timestamp};
use crate::ports::{IssuedToken, TokenAuthority};

/// Configuration for the JWT token authority.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Symmetric signing secret. Never logged or serialized.
    pub token_secret: SecretString,

    /// Token lifetime in seconds.
    pub token_ttl_secs: u64,
}

impl JwtConfig {
    /// Create a configuration with the default 24 hour lifetime.
    pub fn new(token_secret: SecretString) -> Self {
        Self {
            token_secret,
            token_ttl_secs: 86_400,
        }
    }

    /// Set a custom token lifetime.
    pub fn with_ttl_secs(mut self, secs: u64) -> Self {
        self.token_ttl_secs = secs;
        self
    }
}

/// Claims carried by issued tokens.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject - the account id
    sub: String,

    /// Issued at (Unix epoch seconds)
    iat: u64,

    /// Expiry (Unix epoch seconds)
    exp: u64,
}

/// HS256 token authority.
///
/// Signing and verification are pure computation over the configured secret,
/// so the implementation is synchronous and needs no connection state.
pub struct JwtTokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl JwtTokenAuthority {
    pub fn new(config: JwtConfig) -> Self {
        let secret = config.token_secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_secs: config.token_ttl_secs,
        }
    }
}

impl TokenAuthority for JwtTokenAuthority {
    fn issue(&self, account_id: &AccountId) -> Result<IssuedToken, DomainError> {
        let now = Timestamp::now();
        let expires_at = now.plus_secs(self.ttl_secs);

        let claims = Claims {
            sub: account_id.to_string(),
            iat: now.as_unix_secs(),
            exp: expires_at.as_unix_secs(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::persistence(format!("Token signing failed: {}", e)))?;

        Ok(IssuedToken { token, expires_at })
    }

    fn verify(&self, token: &str) -> Option<AccountId> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                e
            })
            .ok()?;

        data.claims.sub.parse().ok()
    }
}

impl std::fmt::Debug for JwtTokenAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenAuthority")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}
