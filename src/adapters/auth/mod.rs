//! Authentication adapters.
//!
//! Implementations of the `TokenAuthority` port:
//!
//! - `jwt` - HS256 tokens signed with a process-held secret
//!
//! Verification is pure computation, so tests exercise the real
//! implementation rather than a mock.

mod jwt;

pub use jwt::{JwtConfig, JwtTokenAuthority};
