//! Token authority port for signed access tokens.
//!
//! Defines the contract for issuing and verifying the stateless credentials
//! that bind a request to an account identity.
//!
//! # Design
//!
//! - **Synchronous**: signing and verification are pure computation over a
//!   process-held secret, no I/O
//! - **Collapsed failures**: malformed tokens, bad signatures, wrong
//!   algorithms, and expired tokens all verify to `None` so callers cannot
//!   probe which check failed
//! - **Minimal claims**: the only claim callers may trust is the account id;
//!   role and status must be re-read from the store on every request

use crate::domain::foundation::{AccountId, DomainError, Timestamp};

/// A freshly issued access token with its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The signed token, opaque to callers.
    pub token: String,

    /// When the token stops verifying.
    pub expires_at: Timestamp,
}

/// Issues and verifies signed access tokens.
pub trait TokenAuthority: Send + Sync {
    /// Issue a token embedding only the account id, valid for the configured
    /// lifetime.
    ///
    /// # Errors
    ///
    /// - `PersistenceError` only if signing itself fails; never for bad input
    fn issue(&self, account_id: &AccountId) -> Result<IssuedToken, DomainError>;

    /// Verify a token and extract the account id.
    ///
    /// Returns `None` on any failure.
    fn verify(&self, token: &str) -> Option<AccountId>;
}
