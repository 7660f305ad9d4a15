//! Account domain - identity, role, and lifecycle status.

mod aggregate;
mod role;
mod status;

pub use aggregate::Account;
pub use role::AccountRole;
pub use status::AccountStatus;
