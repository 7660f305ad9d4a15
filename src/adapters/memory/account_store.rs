//! In-memory account store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::account::Account;
use crate::domain::foundation::{AccountId, DomainError, Email};
use crate::ports::AccountStore;

/// `AccountStore` over a `Mutex`-held map.
///
/// Backs tests and local runs; the mutex stands in for the row-level
/// atomicity a real database gives the same contract.
#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: Mutex<HashMap<AccountId, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub fn len(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    /// True when no accounts are stored.
    pub fn is_empty(&self) -> bool {
        self.accounts.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn create(&self, account: &Account) -> Result<(), DomainError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.values().any(|a| a.email == account.email) {
            return Err(DomainError::validation(
                "email",
                "Email is already registered",
            ));
        }
        accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.values().find(|a| &a.email == email).cloned())
    }
}
