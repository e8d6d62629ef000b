//! Per-route rate limiting for the public token endpoints.

mod service;
mod traits;

pub use service::RateLimitService;
pub use traits::{RateLimitDecision, RateLimiterTrait};

#[cfg(any(test, feature = "test-utils"))]
mod mock;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockRateLimiter;
