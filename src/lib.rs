//! Memberline - Membership backend with provider-synchronized subscriptions
//!
//! This crate keeps local subscription records consistent with a Paystack-style
//! recurring-billing provider through webhooks and member/admin actions.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
