//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `AccountStore` - Account aggregate persistence
//! - `PlanStore` - Plan persistence and provider-code lookup
//! - `SubscriptionStore` - Subscription persistence with atomic,
//!   intent-named mutations
//!
//! ## Provider Ports
//!
//! - `BillingProvider` - Remote subscription operations and webhook
//!   verification against the external billing service
//!
//! ## Auth Ports
//!
//! - `TokenAuthority` - Signed access token issue/verify

mod account_store;
mod billing_provider;
mod plan_store;
mod subscription_store;
mod token_authority;

pub use account_store::AccountStore;
pub use billing_provider::{
    BillingProvider, ProviderError, ProviderEvent, ProviderPlanUpdate, ProviderSubscription,
};
pub use plan_store::PlanStore;
pub use subscription_store::SubscriptionStore;
pub use token_authority::{IssuedToken, TokenAuthority};
