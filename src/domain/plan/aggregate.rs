//! Plan aggregate entity.
//!
//! A Plan is a billing tier members subscribe to. Plans are shared: many
//! subscriptions reference one plan, and no subscription owns it. Identity is
//! immutable; price, status, and features change by admin action.

use crate::domain::foundation::{DomainError, PlanId, Timestamp, ValidationError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::BillingInterval;

/// Availability of a plan for new subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    /// Open for new subscriptions.
    Active,

    /// Retired; existing subscriptions keep billing, no new sign-ups.
    Inactive,
}

/// Plan aggregate - a billing tier.
///
/// # Invariants
///
/// - `id` is globally unique
/// - `price` is non-negative, in major currency units
/// - `provider_plan_code` is present only once the plan has been registered
///   with the billing provider; plan changes require it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Unique identifier for this plan.
    pub id: PlanId,

    /// Human-readable plan name.
    pub name: String,

    /// Price per interval, in major currency units.
    pub price: Decimal,

    /// Billing cadence.
    pub interval: BillingInterval,

    /// Provider-side plan code (e.g. `PLN_…`), absent until the plan is
    /// registered with the provider.
    pub provider_plan_code: Option<String>,

    /// Availability for new subscriptions.
    pub status: PlanStatus,

    /// Feature descriptions shown to subscribers.
    pub features: Vec<String>,

    /// When the plan was created.
    pub created_at: Timestamp,

    /// When the plan was last updated.
    pub updated_at: Timestamp,
}

impl Plan {
    /// Create a new active plan.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name or negative price.
    pub fn new(
        name: impl Into<String>,
        price: Decimal,
        interval: BillingInterval,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name").into());
        }
        if price < Decimal::ZERO {
            return Err(ValidationError::invalid_format("price", "must not be negative").into());
        }

        let now = Timestamp::now();
        Ok(Self {
            id: PlanId::new(),
            name,
            price,
            interval,
            provider_plan_code: None,
            status: PlanStatus::Active,
            features: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Attach the provider-side plan code.
    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_plan_code = Some(code.into());
        self
    }

    /// Attach the feature list.
    pub fn with_features(mut self, features: Vec<String>) -> Self {
        self.features = features;
        self
    }

    /// Returns true if the plan accepts new subscriptions.
    pub fn is_active(&self) -> bool {
        matches!(self.status, PlanStatus::Active)
    }

    /// Returns the provider plan code, failing if the plan was never
    /// registered with the provider.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionFailed` when the code is absent.
    pub fn require_provider_code(&self) -> Result<&str, DomainError> {
        self.provider_plan_code.as_deref().ok_or_else(|| {
            DomainError::precondition_failed("Plan has no provider plan code")
                .with_detail("plan_id", self.id.to_string())
        })
    }

    /// Change the price, in major currency units.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a negative price.
    pub fn update_price(&mut self, price: Decimal) -> Result<(), DomainError> {
        if price < Decimal::ZERO {
            return Err(ValidationError::invalid_format("price", "must not be negative").into());
        }
        self.price = price;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Change plan availability.
    pub fn set_status(&mut self, status: PlanStatus) {
        self.status = status;
        self.updated_at = Timestamp::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_plan() -> Plan {
        Plan::new("Pro", Decimal::from(5000), BillingInterval::Monthly).unwrap()
    }

    #[test]
    fn new_plan_starts_active_without_provider_code() {
        let plan = test_plan();

        assert!(plan.is_active());
        assert!(plan.provider_plan_code.is_none());
        assert!(plan.features.is_empty());
    }

    #[test]
    fn new_plan_rejects_empty_name() {
        let result = Plan::new("  ", Decimal::from(100), BillingInterval::Monthly);
        assert!(result.is_err());
    }

    #[test]
    fn new_plan_rejects_negative_price() {
        let result = Plan::new("Pro", Decimal::from(-1), BillingInterval::Yearly);
        assert!(result.is_err());
    }

    #[test]
    fn with_provider_code_attaches_code() {
        let plan = test_plan().with_provider_code("PLN_x1y2z3");
        assert_eq!(plan.provider_plan_code.as_deref(), Some("PLN_x1y2z3"));
    }

    #[test]
    fn require_provider_code_fails_when_absent() {
        let plan = test_plan();
        let err = plan.require_provider_code().unwrap_err();
        assert_eq!(
            err.code,
            crate::domain::foundation::ErrorCode::PreconditionFailed
        );
    }

    #[test]
    fn require_provider_code_returns_code_when_present() {
        let plan = test_plan().with_provider_code("PLN_x1y2z3");
        assert_eq!(plan.require_provider_code().unwrap(), "PLN_x1y2z3");
    }

    #[test]
    fn update_price_changes_price() {
        let mut plan = test_plan();
        plan.update_price(Decimal::from(7500)).unwrap();
        assert_eq!(plan.price, Decimal::from(7500));
    }

    #[test]
    fn update_price_rejects_negative() {
        let mut plan = test_plan();
        assert!(plan.update_price(Decimal::from(-5)).is_err());
        assert_eq!(plan.price, Decimal::from(5000));
    }

    #[test]
    fn set_status_retires_plan() {
        let mut plan = test_plan();
        plan.set_status(PlanStatus::Inactive);
        assert!(!plan.is_active());
    }
}
