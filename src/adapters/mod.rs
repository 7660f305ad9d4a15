//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - JWT token authority
//! - `http` - axum REST surface and middleware
//! - `memory` - in-memory stores for tests and local runs
//! - `paystack` - billing provider client, webhook verification, mock
//! - `postgres` - sqlx-backed stores

pub mod auth;
pub mod http;
pub mod memory;
pub mod paystack;
pub mod postgres;
