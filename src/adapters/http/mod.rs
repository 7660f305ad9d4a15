//! HTTP adapters - REST API implementations.
//!
//! The subscription area owns the route surface; the middleware module holds
//! the cookie-auth layer shared by any authenticated route.

pub mod middleware;
pub mod subscription;

// Re-export key types for convenience
pub use subscription::api_router;
pub use subscription::SubscriptionAppState;
pub use subscription::SubscriptionHandlers;
