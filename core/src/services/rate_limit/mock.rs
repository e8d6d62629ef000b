//! Counting rate limiter for tests, without window expiry

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use ap_shared::RouteLimit;

use super::traits::{RateLimitDecision, RateLimiterTrait};

#[derive(Default)]
pub struct MockRateLimiter {
    counters: Arc<RwLock<HashMap<String, u32>>>,
    should_fail: AtomicBool,
}

impl MockRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub async fn hits(&self, key: &str) -> u32 {
        self.counters.read().await.get(key).copied().unwrap_or(0)
    }
}

#[async_trait]
impl RateLimiterTrait for MockRateLimiter {
    async fn hit(&self, key: &str, limit: RouteLimit) -> Result<RateLimitDecision, String> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err("limiter unavailable".to_string());
        }
        let mut counters = self.counters.write().await;
        let count = counters.entry(key.to_string()).or_insert(0);
        *count += 1;
        if *count > limit.max_requests {
            Ok(RateLimitDecision::deny(limit.window_seconds))
        } else {
            Ok(RateLimitDecision::allow(limit.max_requests - *count, limit.window_seconds))
        }
    }

    async fn reset(&self, key: &str) -> Result<(), String> {
        self.counters.write().await.remove(key);
        Ok(())
    }
}
