//! Paystack billing provider adapter.
//!
//! Implements the `BillingProvider` port for Paystack integration, including:
//! - Subscription discovery by plan and customer
//! - Self-service manage links
//! - Remote subscription disable and plan moves
//! - Webhook signature verification
//!
//! # Security
//!
//! - Webhook bodies use HMAC-SHA512 with constant-time comparison
//! - The secret key is handled via `secrecy::SecretString`

mod client;
mod mock;
mod webhook;

pub use client::{PaystackClient, PaystackConfig};
pub use mock::{MethodCall, MockBillingProvider};
pub use webhook::{compute_signature, parse_provider_date, verify_signature};
