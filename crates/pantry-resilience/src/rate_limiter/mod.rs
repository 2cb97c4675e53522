//! Rate limiter implementation.

use governor::{DefaultKeyedRateLimiter, Quota};
use pantry_core::PantryError;
use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

/// Number of tracked clients above which idle buckets are evicted.
const MAX_TRACKED_CLIENTS: usize = 10_000;

/// Per-client rate limiter keyed on the caller's IP address.
///
/// Every address gets its own quota. Clones share the same buckets.
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
}

impl RateLimiter {
    /// Creates a rate limiter allowing `requests` per minute for each client.
    ///
    /// The full minute's allowance is available as a burst.
    #[must_use]
    pub fn per_minute(requests: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN));
        Self {
            limiter: Arc::new(DefaultKeyedRateLimiter::<IpAddr>::keyed(quota)),
        }
    }

    /// Checks if a request from `client` is allowed (non-blocking).
    pub fn check(&self, client: IpAddr) -> Result<(), PantryError> {
        if self.limiter.len() > MAX_TRACKED_CLIENTS {
            self.limiter.retain_recent();
        }

        self.limiter
            .check_key(&client)
            .map_err(|_| PantryError::RateLimitExceeded)
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("tracked_clients", &self.limiter.len())
            .finish_non_exhaustive()
    }
}
