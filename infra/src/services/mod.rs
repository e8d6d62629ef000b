//! Infrastructure service implementations
//!
//! - `rate_limit`: fixed window counters in memory or Redis
//! - `delivery`: link delivery sinks

pub mod delivery;
pub mod rate_limit;

pub use delivery::LogLinkDelivery;
pub use rate_limit::{create_rate_limiter, MemoryRateLimiter};
#[cfg(feature = "redis-cache")]
pub use rate_limit::RedisRateLimiter;
