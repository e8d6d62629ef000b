//! Per-process fixed window counters

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use ap_core::services::{RateLimitDecision, RateLimiterTrait};
use ap_shared::RouteLimit;

/// Windows kept before expired ones are swept on the next hit
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    length: Duration,
    count: u32,
}

impl Window {
    fn is_expired_at(&self, now: Instant) -> bool {
        now.duration_since(self.started) >= self.length
    }

    fn seconds_left_at(&self, now: Instant) -> u64 {
        let left = self.length.saturating_sub(now.duration_since(self.started));
        // Whole seconds, rounded up
        left.as_secs() + u64::from(left.subsec_nanos() > 0)
    }
}

/// In-memory limiter for single instance deployments and tests
#[derive(Default)]
pub struct MemoryRateLimiter {
    windows: Mutex<HashMap<String, Window>>,
}

impl MemoryRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Drop every window that has run out
fn sweep(windows: &mut HashMap<String, Window>, now: Instant) -> usize {
    let before = windows.len();
    windows.retain(|_, window| !window.is_expired_at(now));
    before - windows.len()
}

#[async_trait]
impl RateLimiterTrait for MemoryRateLimiter {
    async fn hit(&self, key: &str, limit: RouteLimit) -> Result<RateLimitDecision, String> {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;

        if windows.len() >= SWEEP_THRESHOLD {
            sweep(&mut windows, now);
        }

        let window = windows
            .entry(key.to_string())
            .and_modify(|window| {
                if window.is_expired_at(now) {
                    *window = Window {
                        started: now,
                        length: Duration::from_secs(limit.window_seconds),
                        count: 0,
                    };
                }
            })
            .or_insert(Window {
                started: now,
                length: Duration::from_secs(limit.window_seconds),
                count: 0,
            });

        let retry_after = window.seconds_left_at(now);
        if window.count >= limit.max_requests {
            return Ok(RateLimitDecision::deny(retry_after));
        }

        window.count += 1;
        Ok(RateLimitDecision::allow(limit.max_requests - window.count, retry_after))
    }

    async fn reset(&self, key: &str) -> Result<(), String> {
        self.windows.lock().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_blocks_after_limit_until_window_ends() {
        let limiter = MemoryRateLimiter::new();
        let limit = RouteLimit::per_minute(3);

        for expected_remaining in [2, 1, 0] {
            let decision = limiter.hit("resend:1.2.3.4", limit).await.unwrap();
            assert!(decision.allowed);
            assert_eq!(decision.remaining, expected_remaining);
        }

        let denied = limiter.hit("resend:1.2.3.4", limit).await.unwrap();
        assert!(!denied.allowed);
        assert_eq!(denied.retry_after_seconds, 60);

        tokio::time::advance(Duration::from_secs(45)).await;
        let denied = limiter.hit("resend:1.2.3.4", limit).await.unwrap();
        assert!(!denied.allowed);
        assert_eq!(denied.retry_after_seconds, 15);

        tokio::time::advance(Duration::from_secs(15)).await;
        assert!(limiter.hit("resend:1.2.3.4", limit).await.unwrap().allowed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let limiter = MemoryRateLimiter::new();
        let limit = RouteLimit::per_minute(1);

        assert!(limiter.hit("upload:10.0.0.1", limit).await.unwrap().allowed);
        assert!(!limiter.hit("upload:10.0.0.1", limit).await.unwrap().allowed);
        assert!(limiter.hit("upload:10.0.0.2", limit).await.unwrap().allowed);
        assert!(limiter.hit("resend:10.0.0.1", limit).await.unwrap().allowed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_and_sweep() {
        let limiter = MemoryRateLimiter::new();
        let limit = RouteLimit::per_minute(1);

        limiter.hit("a", limit).await.unwrap();
        limiter.hit("b", limit).await.unwrap();
        limiter.reset("a").await.unwrap();
        assert!(limiter.hit("a", limit).await.unwrap().allowed);

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(sweep(&mut *limiter.windows.lock().await, Instant::now()), 2);
        assert!(limiter.windows.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_zero_limit_denies_everything() {
        let limiter = MemoryRateLimiter::new();
        let decision = limiter.hit("k", RouteLimit::per_minute(0)).await.unwrap();
        assert!(!decision.allowed);
    }
}
