//! Middleware module
//!
//! Request-level concerns: authentication extractors and rate limiting.

pub mod auth;
pub mod rate_limit;

pub use auth::{AdminUser, AuthUser, BearerToken};
pub use rate_limit::RateLimiter;
