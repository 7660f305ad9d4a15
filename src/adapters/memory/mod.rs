//! In-memory store adapters.
//!
//! Implement the persistence ports over `Mutex`-held maps with the same
//! conditional-write contract as the Postgres adapters. Used by unit and
//! integration tests and by local runs without a database.

mod account_store;
mod plan_store;
mod subscription_store;

pub use account_store::InMemoryAccountStore;
pub use plan_store::InMemoryPlanStore;
pub use subscription_store::InMemorySubscriptionStore;
