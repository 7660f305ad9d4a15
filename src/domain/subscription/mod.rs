//! Subscription domain - the provider-synchronized lifecycle record.

mod aggregate;
mod lifecycle;
mod money;

pub use aggregate::Subscription;
pub use lifecycle::LifecycleState;
pub use money::{minor_to_major, MINOR_UNIT_SCALE};
