//! Rate limiting traits for the public endpoints

use async_trait::async_trait;
use ap_shared::RouteLimit;

/// Outcome of counting one request against a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Requests left in the current window
    pub remaining: u32,
    /// Seconds until the window resets
    pub retry_after_seconds: u64,
}

impl RateLimitDecision {
    pub fn allow(remaining: u32, retry_after_seconds: u64) -> Self {
        Self {
            allowed: true,
            remaining,
            retry_after_seconds,
        }
    }

    pub fn deny(retry_after_seconds: u64) -> Self {
        Self {
            allowed: false,
            remaining: 0,
            retry_after_seconds,
        }
    }
}

/// Fixed window counter keyed by an opaque string
#[async_trait]
pub trait RateLimiterTrait: Send + Sync {
    /// Count a request under `key` and decide whether it may proceed
    async fn hit(&self, key: &str, limit: RouteLimit) -> Result<RateLimitDecision, String>;

    /// Forget the counter of a key
    async fn reset(&self, key: &str) -> Result<(), String>;
}
