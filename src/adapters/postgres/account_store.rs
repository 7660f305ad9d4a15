//! PostgreSQL implementation of AccountStore.
//!
//! Provides persistent storage for Account aggregates using PostgreSQL.

use crate::domain::account::{Account, AccountRole, AccountStatus};
use crate::domain::foundation::{AccountId, DomainError, Email, Timestamp};
use crate::ports::AccountStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the AccountStore port.
///
/// Uses sqlx for type-safe database operations with connection pooling.
/// Email uniqueness is enforced by the `accounts_email_key` constraint.
pub struct PostgresAccountStore {
    pool: PgPool,
}

impl PostgresAccountStore {
    /// Creates a new PostgresAccountStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an account.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    role: String,
    status: String,
    password_digest: Option<String>,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = DomainError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        // Stored emails were normalized on the way in; a failure here means
        // the row was written by something other than this adapter.
        let email = Email::new(row.email)
            .map_err(|e| DomainError::persistence(format!("Invalid email in account row: {}", e)))?;

        Ok(Account {
            id: AccountId::from_uuid(row.id),
            email,
            role: parse_role(&row.role)?,
            status: parse_status(&row.status)?,
            password_digest: row.password_digest,
            last_login_at: row.last_login_at.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn parse_role(s: &str) -> Result<AccountRole, DomainError> {
    match s.to_lowercase().as_str() {
        "member" => Ok(AccountRole::Member),
        "admin" => Ok(AccountRole::Admin),
        "superadmin" => Ok(AccountRole::Superadmin),
        _ => Err(DomainError::persistence(format!(
            "Invalid role value: {}",
            s
        ))),
    }
}

fn parse_status(s: &str) -> Result<AccountStatus, DomainError> {
    match s.to_lowercase().as_str() {
        "active" => Ok(AccountStatus::Active),
        "inactive" => Ok(AccountStatus::Inactive),
        "suspended" => Ok(AccountStatus::Suspended),
        _ => Err(DomainError::persistence(format!(
            "Invalid status value: {}",
            s
        ))),
    }
}

fn role_to_string(role: &AccountRole) -> &'static str {
    match role {
        AccountRole::Member => "member",
        AccountRole::Admin => "admin",
        AccountRole::Superadmin => "superadmin",
    }
}

fn status_to_string(status: &AccountStatus) -> &'static str {
    match status {
        AccountStatus::Active => "active",
        AccountStatus::Inactive => "inactive",
        AccountStatus::Suspended => "suspended",
    }
}

#[async_trait]
impl AccountStore for PostgresAccountStore {
    async fn create(&self, account: &Account) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                id, email, role, status, password_digest, last_login_at,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(account.email.as_str())
        .bind(role_to_string(&account.role))
        .bind(status_to_string(&account.status))
        .bind(&account.password_digest)
        .bind(account.last_login_at.map(|t| *t.as_datetime()))
        .bind(account.created_at.as_datetime())
        .bind(account.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("accounts_email_key") {
                    return DomainError::validation("email", "Email is already registered");
                }
            }
            DomainError::persistence(format!("Failed to save account: {}", e))
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, email, role, status, password_digest, last_login_at,
                   created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::persistence(format!("Failed to find account: {}", e)))?;

        row.map(Account::try_from).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, DomainError> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, email, role, status, password_digest, last_login_at,
                   created_at, updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::persistence(format!("Failed to find account: {}", e)))?;

        row.map(Account::try_from).transpose()
    }
}
