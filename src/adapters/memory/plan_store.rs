//! In-memory plan store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PlanId};
use crate::domain::plan::Plan;
use crate::ports::PlanStore;

/// `PlanStore` over a `Mutex`-held map.
#[derive(Default)]
pub struct InMemoryPlanStore {
    plans: Mutex<HashMap<PlanId, Plan>>,
}

impl InMemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlanStore for InMemoryPlanStore {
    async fn create(&self, plan: &Plan) -> Result<(), DomainError> {
        self.plans.lock().unwrap().insert(plan.id, plan.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &PlanId) -> Result<Option<Plan>, DomainError> {
        let plans = self.plans.lock().unwrap();
        Ok(plans.get(id).cloned())
    }

    async fn find_by_provider_code(&self, code: &str) -> Result<Option<Plan>, DomainError> {
        let plans = self.plans.lock().unwrap();
        Ok(plans
            .values()
            .find(|p| p.provider_plan_code.as_deref() == Some(code))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::plan::BillingInterval;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn create_then_find_by_id() {
        let store = InMemoryPlanStore::new();
        let plan = Plan::new("Pro", Decimal::from(5000), BillingInterval::Monthly).unwrap();
        store.create(&plan).await.unwrap();

        let found = store.find_by_id(&plan.id).await.unwrap();
        assert_eq!(found.unwrap().name, "Pro");
    }

    #[tokio::test]
    async fn find_by_provider_code_matches() {
        let store = InMemoryPlanStore::new();
        let plan = Plan::new("Pro", Decimal::from(5000), BillingInterval::Monthly)
            .unwrap()
            .with_provider_code("PLN_pro_monthly");
        store.create(&plan).await.unwrap();

        let found = store.find_by_provider_code("PLN_pro_monthly").await.unwrap();
        assert_eq!(found.unwrap().id, plan.id);

        let missing = store.find_by_provider_code("PLN_other").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn unsynced_plans_have_no_provider_code_match() {
        let store = InMemoryPlanStore::new();
        let plan = Plan::new("Basic", Decimal::from(1000), BillingInterval::Yearly).unwrap();
        store.create(&plan).await.unwrap();

        let found = store.find_by_provider_code("PLN_basic").await.unwrap();
        assert!(found.is_none());
    }
}
