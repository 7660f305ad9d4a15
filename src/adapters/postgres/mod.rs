//! PostgreSQL adapters - Database implementations for store ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresAccountStore` - Accounts with unique normalized emails
//! - `PostgresPlanStore` - Billing plans with unique provider codes
//! - `PostgresSubscriptionStore` - Subscriptions with single-statement
//!   conditional mutations

mod account_store;
mod plan_store;
mod subscription_store;

pub use account_store::PostgresAccountStore;
pub use plan_store::PostgresPlanStore;
pub use subscription_store::PostgresSubscriptionStore;
