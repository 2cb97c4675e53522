//! Caching infrastructure for the service layer.
//!
//! A key/value abstraction with a Redis implementation, plus the key scheme
//! used by the product read paths.

mod cache_interface;
pub mod cache_keys;
mod redis_cache;

pub use cache_interface::CacheInterface;
pub use redis_cache::{RedisCacheService, DEFAULT_TTL};
