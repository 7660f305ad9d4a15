//! Authorization gate - resolves tokens to accounts and enforces access rules.
//!
//! Every authenticated operation passes through here before touching
//! subscription state: the token is verified, the account is re-read from the
//! store (role and status may have changed since issuance), and the role
//! filter is applied. The ownership predicates are pure and reusable by any
//! handler that mutates another account's resources.

use std::sync::Arc;

use crate::domain::account::Account;
use crate::domain::foundation::{AccountId, DomainError};
use crate::ports::{AccountStore, TokenAuthority};

/// Resolves verified tokens to accounts and enforces role and ownership
/// constraints.
pub struct AuthorizationGate {
    tokens: Arc<dyn TokenAuthority>,
    accounts: Arc<dyn AccountStore>,
}

impl AuthorizationGate {
    pub fn new(tokens: Arc<dyn TokenAuthority>, accounts: Arc<dyn AccountStore>) -> Self {
        Self { tokens, accounts }
    }

    /// Authenticate a raw token, optionally requiring a staff role.
    ///
    /// An invalid token, a missing account, and a role mismatch all collapse
    /// to the same `Unauthenticated` error so callers cannot probe which
    /// accounts exist.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` when no account matches the token under the
    /// role filter.
    pub async fn authenticate(
        &self,
        token: &str,
        require_admin: bool,
    ) -> Result<Account, DomainError> {
        // 1. Resolve the token to an account id
        let account_id = match self.tokens.verify(token) {
            Some(id) => id,
            None => return Err(DomainError::unauthenticated()),
        };

        // 2. Re-read the account; claims other than the id are never trusted
        let account = self
            .accounts
            .find_by_id(&account_id)
            .await?
            .ok_or_else(DomainError::unauthenticated)?;

        // 3. Apply the role filter
        if require_admin && !account.can_administer() {
            return Err(DomainError::unauthenticated());
        }

        Ok(account)
    }

    /// The single ownership predicate for subscription-mutating operations:
    /// the actor must own the resource or hold the superadmin role.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for any other account.
    pub fn authorize_owner_or_superadmin(
        actor: &Account,
        resource_owner: &AccountId,
    ) -> Result<(), DomainError> {
        if actor.id == *resource_owner || actor.is_superadmin() {
            return Ok(());
        }
        Err(DomainError::forbidden("Not the subscription owner"))
    }

    /// Restrict an operation to superadmins.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for any other role.
    pub fn authorize_superadmin(actor: &Account) -> Result<(), DomainError> {
        if actor.is_superadmin() {
            return Ok(());
        }
        Err(DomainError::forbidden("Superadmin role required"))
    }
}
