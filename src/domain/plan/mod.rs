//! Plan domain - billing tiers referenced by subscriptions.

mod aggregate;
mod interval;

pub use aggregate::{Plan, PlanStatus};
pub use interval::BillingInterval;
