//! Account role definitions.
//!
//! Roles are a closed enumeration; authorization decisions branch on these
//! variants rather than on raw strings.

use serde::{Deserialize, Serialize};

/// Role held by an account.
///
/// Determines which lifecycle operations the account may invoke and whether
/// it may act on subscriptions it does not own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    /// Regular subscriber. May act only on their own subscription.
    Member,

    /// Staff role with access to the admin surface.
    Admin,

    /// Staff role that may additionally act on any account's subscription.
    Superadmin,
}

impl AccountRole {
    /// Returns true for staff roles (admin surface access).
    pub fn can_administer(&self) -> bool {
        !matches!(self, AccountRole::Member)
    }

    /// Returns true only for the superadmin role.
    pub fn is_superadmin(&self) -> bool {
        matches!(self, AccountRole::Superadmin)
    }

    /// Returns the display name for this role.
    pub fn display_name(&self) -> &'static str {
        match self {
            AccountRole::Member => "Member",
            AccountRole::Admin => "Admin",
            AccountRole::Superadmin => "Superadmin",
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_cannot_administer() {
        assert!(!AccountRole::Member.can_administer());
    }

    #[test]
    fn admin_can_administer() {
        assert!(AccountRole::Admin.can_administer());
    }

    #[test]
    fn superadmin_can_administer() {
        assert!(AccountRole::Superadmin.can_administer());
    }

    #[test]
    fn only_superadmin_is_superadmin() {
        assert!(AccountRole::Superadmin.is_superadmin());
        assert!(!AccountRole::Admin.is_superadmin());
        assert!(!AccountRole::Member.is_superadmin());
    }

    #[test]
    fn role_serializes_lowercase() {
        let role = AccountRole::Superadmin;
        let json = serde_json::to_string(&role).unwrap();
        assert_eq!(json, "\"superadmin\"");
    }

    #[test]
    fn role_deserializes_from_lowercase() {
        let role: AccountRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, AccountRole::Admin);
    }
}
