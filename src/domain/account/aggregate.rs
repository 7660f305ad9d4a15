//! Account aggregate entity.
//!
//! An Account is the identity every operation is authorized against. Each
//! account owns at most one Subscription; staff roles additionally act on
//! subscriptions they do not own.
//!
//! # Design Decisions
//!
//! - **Unique email**: webhook events are matched to accounts by customer
//!   email, enforced unique at the database level
//! - **Soft states only**: accounts are deactivated or suspended, never
//!   deleted
//! - **Opaque credential**: the password digest is produced and checked
//!   outside this core; it is carried but never interpreted here

use crate::domain::foundation::{AccountId, DomainError, Email, Timestamp};
use serde::{Deserialize, Serialize};

use super::{AccountRole, AccountStatus};

/// Account aggregate - the authorization subject.
///
/// # Invariants
///
/// - `id` is globally unique
/// - `email` is unique across accounts (webhook matching key)
/// - Status transitions follow state machine rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for this account.
    pub id: AccountId,

    /// Normalized unique email address.
    pub email: Email,

    /// Role governing which operations this account may invoke.
    pub role: AccountRole,

    /// Current lifecycle status.
    pub status: AccountStatus,

    /// Opaque password digest, absent for invite-only accounts that have
    /// not completed registration.
    pub password_digest: Option<String>,

    /// Last successful sign-in.
    pub last_login_at: Option<Timestamp>,

    /// When the account was created.
    pub created_at: Timestamp,

    /// When the account was last updated.
    pub updated_at: Timestamp,
}

impl Account {
    /// Create a member account from self-service registration.
    pub fn register(email: Email, password_digest: String) -> Self {
        let now = Timestamp::now();
        Self {
            id: AccountId::new(),
            email,
            role: AccountRole::Member,
            status: AccountStatus::Active,
            password_digest: Some(password_digest),
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an account with an explicit role (staff invite path).
    ///
    /// The credential is absent until the invitee completes registration.
    pub fn invite(email: Email, role: AccountRole) -> Self {
        let now = Timestamp::now();
        Self {
            id: AccountId::new(),
            email,
            role,
            status: AccountStatus::Active,
            password_digest: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true for staff roles.
    pub fn can_administer(&self) -> bool {
        self.role.can_administer()
    }

    /// Returns true only for superadmins.
    pub fn is_superadmin(&self) -> bool {
        self.role.is_superadmin()
    }

    /// Record a successful sign-in.
    pub fn record_login(&mut self, at: Timestamp) {
        self.last_login_at = Some(at);
        self.updated_at = Timestamp::now();
    }

    /// Change the account status through the state machine.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the transition is not allowed.
    pub fn change_status(&mut self, target: AccountStatus) -> Result<(), DomainError> {
        use crate::domain::foundation::StateMachine;

        self.status = self.status.transition_to(target)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
