//! PostgreSQL implementation of PlanStore.
//!
//! Provides persistent storage for Plan aggregates using PostgreSQL.

use crate::domain::foundation::{DomainError, PlanId, Timestamp};
use crate::domain::plan::{BillingInterval, Plan, PlanStatus};
use crate::ports::PlanStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the PlanStore port.
///
/// Provider plan codes are unique, so the provider-confirmed code after a
/// plan change resolves to at most one local plan.
pub struct PostgresPlanStore {
    pool: PgPool,
}

impl PostgresPlanStore {
    /// Creates a new PostgresPlanStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a plan.
#[derive(Debug, sqlx::FromRow)]
struct PlanRow {
    id: Uuid,
    name: String,
    price: Decimal,
    billing_interval: String,
    provider_plan_code: Option<String>,
    status: String,
    features: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PlanRow> for Plan {
    type Error = DomainError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        Ok(Plan {
            id: PlanId::from_uuid(row.id),
            name: row.name,
            price: row.price,
            interval: parse_interval(&row.billing_interval)?,
            provider_plan_code: row.provider_plan_code,
            status: parse_status(&row.status)?,
            features: row.features,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn parse_interval(s: &str) -> Result<BillingInterval, DomainError> {
    match s.to_lowercase().as_str() {
        "monthly" => Ok(BillingInterval::Monthly),
        "yearly" => Ok(BillingInterval::Yearly),
        _ => Err(DomainError::persistence(format!(
            "Invalid billing interval value: {}",
            s
        ))),
    }
}

fn parse_status(s: &str) -> Result<PlanStatus, DomainError> {
    match s.to_lowercase().as_str() {
        "active" => Ok(PlanStatus::Active),
        "inactive" => Ok(PlanStatus::Inactive),
        _ => Err(DomainError::persistence(format!(
            "Invalid plan status value: {}",
            s
        ))),
    }
}

fn interval_to_string(interval: &BillingInterval) -> &'static str {
    match interval {
        BillingInterval::Monthly => "monthly",
        BillingInterval::Yearly => "yearly",
    }
}

fn status_to_string(status: &PlanStatus) -> &'static str {
    match status {
        PlanStatus::Active => "active",
        PlanStatus::Inactive => "inactive",
    }
}

#[async_trait]
impl PlanStore for PostgresPlanStore {
    async fn create(&self, plan: &Plan) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO plans (
                id, name, price, billing_interval, provider_plan_code, status,
                features, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(plan.id.as_uuid())
        .bind(&plan.name)
        .bind(plan.price)
        .bind(interval_to_string(&plan.interval))
        .bind(&plan.provider_plan_code)
        .bind(status_to_string(&plan.status))
        .bind(&plan.features)
        .bind(plan.created_at.as_datetime())
        .bind(plan.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("plans_provider_plan_code_key") {
                    return DomainError::validation(
                        "provider_plan_code",
                        "Provider plan code is already registered",
                    );
                }
            }
            DomainError::persistence(format!("Failed to save plan: {}", e))
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &PlanId) -> Result<Option<Plan>, DomainError> {
        let row: Option<PlanRow> = sqlx::query_as(
            r#"
            SELECT id, name, price, billing_interval, provider_plan_code, status,
                   features, created_at, updated_at
            FROM plans
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::persistence(format!("Failed to find plan: {}", e)))?;

        row.map(Plan::try_from).transpose()
    }

    async fn find_by_provider_code(&self, code: &str) -> Result<Option<Plan>, DomainError> {
        let row: Option<PlanRow> = sqlx::query_as(
            r#"
            SELECT id, name, price, billing_interval, provider_plan_code, status,
                   features, created_at, updated_at
            FROM plans
            WHERE provider_plan_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::persistence(format!("Failed to find plan: {}", e)))?;

        row.map(Plan::try_from).transpose()
    }
}
