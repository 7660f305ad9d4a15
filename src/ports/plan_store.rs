//! Plan store port.
//!
//! Defines the contract for persisting and retrieving billing Plans.

use crate::domain::foundation::{DomainError, PlanId};
use crate::domain::plan::Plan;
use async_trait::async_trait;

/// Store port for Plan persistence.
///
/// "Found nothing" is `Ok(None)`; only store failures are errors.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Persist a new plan.
    ///
    /// # Errors
    ///
    /// - `PersistenceError` on store failure
    async fn create(&self, plan: &Plan) -> Result<(), DomainError>;

    /// Find a plan by its ID.
    async fn find_by_id(&self, id: &PlanId) -> Result<Option<Plan>, DomainError>;

    /// Find a plan by its provider-side plan code.
    ///
    /// Used to resolve the plan the provider reports after a plan change,
    /// which is authoritative over the caller-supplied plan id.
    async fn find_by_provider_code(&self, code: &str) -> Result<Option<Plan>, DomainError>;
}
