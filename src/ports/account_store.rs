//! Account store port.
//!
//! Defines the contract for persisting and retrieving Account aggregates.
//!
//! # Design
//!
//! - **Unique email**: at most one account per normalized email address
//! - **Soft lifecycle**: accounts are never physically deleted; status
//!   transitions cover deactivation

use crate::domain::account::Account;
use crate::domain::foundation::{AccountId, DomainError, Email};
use async_trait::async_trait;

/// Store port for Account persistence.
///
/// "Found nothing" is `Ok(None)`; only store failures are errors.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persist a new account.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the email is already taken
    /// - `PersistenceError` on store failure
    async fn create(&self, account: &Account) -> Result<(), DomainError>;

    /// Find an account by its ID.
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError>;

    /// Find an account by its normalized email.
    ///
    /// This is how webhook events are matched to local accounts.
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, DomainError>;
}
