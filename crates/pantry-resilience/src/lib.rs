//! # Pantry Resilience
//!
//! Resilience patterns for the Pantry catalog.
//! Provides bounded retry, timeouts, and rate limiting.

pub mod rate_limiter;
pub mod retry;
pub mod timeout;

pub use rate_limiter::*;
pub use retry::*;
pub use timeout::*;
