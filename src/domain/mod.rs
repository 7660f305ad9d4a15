//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `account` - Identity, role, and account lifecycle status
//! - `plan` - Billing tiers referenced by subscriptions
//! - `subscription` - The provider-synchronized subscription lifecycle

pub mod account;
pub mod foundation;
pub mod plan;
pub mod subscription;
