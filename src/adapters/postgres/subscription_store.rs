//! PostgreSQL implementation of SubscriptionStore.
//!
//! Every mutation is a single UPDATE statement keyed by id, with the
//! uncancelled guard folded into the WHERE clause where the port requires
//! it. A webhook and a user action racing on the same record therefore
//! resolve entirely inside the database; `rows_affected` tells the caller
//! which side won.

use crate::domain::foundation::{AccountId, DomainError, PlanId, SubscriptionId, Timestamp};
use crate::domain::subscription::Subscription;
use crate::ports::SubscriptionStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the SubscriptionStore port.
///
/// One subscription per account is enforced by the
/// `subscriptions_account_id_key` constraint.
pub struct PostgresSubscriptionStore {
    pool: PgPool,
}

impl PostgresSubscriptionStore {
    /// Creates a new PostgresSubscriptionStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a subscription.
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    account_id: Uuid,
    plan_id: Uuid,
    subscription_code: Option<String>,
    email_token: Option<String>,
    customer_code: Option<String>,
    next_billing_date: Option<DateTime<Utc>>,
    amount: Decimal,
    cancelled_at: Option<DateTime<Utc>>,
    cancellation_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SubscriptionRow> for Subscription {
    fn from(row: SubscriptionRow) -> Self {
        Subscription {
            id: SubscriptionId::from_uuid(row.id),
            account_id: AccountId::from_uuid(row.account_id),
            plan_id: PlanId::from_uuid(row.plan_id),
            subscription_code: row.subscription_code,
            email_token: row.email_token,
            customer_code: row.customer_code,
            next_billing_date: row.next_billing_date.map(Timestamp::from_datetime),
            amount: row.amount,
            cancelled_at: row.cancelled_at.map(Timestamp::from_datetime),
            cancellation_reason: row.cancellation_reason,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        }
    }
}

#[async_trait]
impl SubscriptionStore for PostgresSubscriptionStore {
    async fn create(&self, subscription: &Subscription) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions (
                id, account_id, plan_id, subscription_code, email_token,
                customer_code, next_billing_date, amount, cancelled_at,
                cancellation_reason, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(subscription.id.as_uuid())
        .bind(subscription.account_id.as_uuid())
        .bind(subscription.plan_id.as_uuid())
        .bind(&subscription.subscription_code)
        .bind(&subscription.email_token)
        .bind(&subscription.customer_code)
        .bind(subscription.next_billing_date.map(|t| *t.as_datetime()))
        .bind(subscription.amount)
        .bind(subscription.cancelled_at.map(|t| *t.as_datetime()))
        .bind(&subscription.cancellation_reason)
        .bind(subscription.created_at.as_datetime())
        .bind(subscription.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("subscriptions_account_id_key") {
                    return DomainError::validation(
                        "account_id",
                        "Account already has a subscription",
                    );
                }
            }
            DomainError::persistence(format!("Failed to save subscription: {}", e))
        })?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &SubscriptionId,
    ) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(
            r#"
            SELECT id, account_id, plan_id, subscription_code, email_token,
                   customer_code, next_billing_date, amount, cancelled_at,
                   cancellation_reason, created_at, updated_at
            FROM subscriptions
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::persistence(format!("Failed to find subscription: {}", e)))?;

        Ok(row.map(Subscription::from))
    }

    async fn find_by_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(
            r#"
            SELECT id, account_id, plan_id, subscription_code, email_token,
                   customer_code, next_billing_date, amount, cancelled_at,
                   cancellation_reason, created_at, updated_at
            FROM subscriptions
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::persistence(format!("Failed to find subscription: {}", e)))?;

        Ok(row.map(Subscription::from))
    }

    async fn record_provider_link(
        &self,
        id: &SubscriptionId,
        subscription_code: &str,
        next_billing_date: Option<Timestamp>,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions SET
                subscription_code = $2,
                next_billing_date = $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(subscription_code)
        .bind(next_billing_date.map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::persistence(format!("Failed to record provider link: {}", e))
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Subscription not found"));
        }

        Ok(())
    }

    async fn record_provider_identity(
        &self,
        id: &SubscriptionId,
        subscription_code: &str,
        email_token: &str,
        next_billing_date: Option<Timestamp>,
    ) -> Result<(), DomainError> {
        // COALESCE keeps the stored billing date when the provider query
        // did not report one.
        let result = sqlx::query(
            r#"
            UPDATE subscriptions SET
                subscription_code = $2,
                email_token = $3,
                next_billing_date = COALESCE($4, next_billing_date),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(subscription_code)
        .bind(email_token)
        .bind(next_billing_date.map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::persistence(format!("Failed to record provider identity: {}", e))
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Subscription not found"));
        }

        Ok(())
    }

    async fn record_cancellation(
        &self,
        id: &SubscriptionId,
        cancelled_at: Timestamp,
        reason: Option<String>,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions SET
                cancelled_at = $2,
                cancellation_reason = $3,
                updated_at = NOW()
            WHERE id = $1 AND cancelled_at IS NULL
            "#,
        )
        .bind(id.as_uuid())
        .bind(cancelled_at.as_datetime())
        .bind(&reason)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::persistence(format!("Failed to record cancellation: {}", e))
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_plan_change(
        &self,
        id: &SubscriptionId,
        plan_id: &PlanId,
        amount: Decimal,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions SET
                plan_id = $2,
                amount = $3,
                updated_at = NOW()
            WHERE id = $1 AND cancelled_at IS NULL
            "#,
        )
        .bind(id.as_uuid())
        .bind(plan_id.as_uuid())
        .bind(amount)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::persistence(format!("Failed to record plan change: {}", e))
        })?;

        Ok(result.rows_affected() > 0)
    }
}
