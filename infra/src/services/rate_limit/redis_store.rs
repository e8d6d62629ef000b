//! Redis backed fixed window counters shared between instances

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, Script};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use ap_core::services::{RateLimitDecision, RateLimiterTrait};
use ap_shared::RouteLimit;

use crate::InfrastructureError;

/// Count a hit and start the window on the first one
///
/// KEYS[1]: counter key
/// ARGV[1]: window length in seconds
///
/// Returns `{count, ttl}` after the increment.
const FIXED_WINDOW_SCRIPT: &str = r#"
local count = redis.call('INCR', KEYS[1])
if count == 1 then
    redis.call('EXPIRE', KEYS[1], tonumber(ARGV[1]))
end
local ttl = redis.call('TTL', KEYS[1])
if ttl < 0 then
    redis.call('EXPIRE', KEYS[1], tonumber(ARGV[1]))
    ttl = tonumber(ARGV[1])
end
return {count, ttl}
"#;

const MAX_CONNECT_ATTEMPTS: u32 = 3;
const RETRY_DELAY_MS: u64 = 100;

pub struct RedisRateLimiter {
    connection: MultiplexedConnection,
    script: Script,
    key_prefix: String,
}

impl RedisRateLimiter {
    /// Connect with a few retries and exponential backoff
    pub async fn connect(url: &str, key_prefix: &str) -> Result<Self, InfrastructureError> {
        let client = Client::open(url).map_err(|e| {
            error!(error = %e, "Failed to parse Redis URL");
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let mut attempts = 0;
        let mut delay = RETRY_DELAY_MS;
        let connection = loop {
            attempts += 1;
            match client.get_multiplexed_async_connection().await {
                Ok(connection) => break connection,
                Err(e) if attempts < MAX_CONNECT_ATTEMPTS => {
                    warn!(
                        attempt = attempts,
                        max_attempts = MAX_CONNECT_ATTEMPTS,
                        error = %e,
                        "Failed to connect to Redis, retrying in {}ms",
                        delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(5000);
                }
                Err(e) => {
                    error!(attempts, error = %e, "Failed to connect to Redis");
                    return Err(InfrastructureError::Cache(e));
                }
            }
        };

        info!(prefix = key_prefix, "Redis rate limiter connected");
        Ok(Self {
            connection,
            script: Script::new(FIXED_WINDOW_SCRIPT),
            key_prefix: key_prefix.to_string(),
        })
    }

    fn counter_key(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }
}

#[async_trait]
impl RateLimiterTrait for RedisRateLimiter {
    async fn hit(&self, key: &str, limit: RouteLimit) -> Result<RateLimitDecision, String> {
        let mut conn = self.connection.clone();
        let (count, ttl): (i64, i64) = self
            .script
            .key(self.counter_key(key))
            .arg(limit.window_seconds.max(1))
            .invoke_async(&mut conn)
            .await
            .map_err(|e| format!("Failed to count rate limit: {}", e))?;

        let retry_after = ttl.max(1) as u64;
        let max = i64::from(limit.max_requests);
        if count > max {
            debug!(key, count, "Rate limit exceeded");
            return Ok(RateLimitDecision::deny(retry_after));
        }
        Ok(RateLimitDecision::allow((max - count) as u32, retry_after))
    }

    async fn reset(&self, key: &str) -> Result<(), String> {
        let mut conn = self.connection.clone();
        let _: i64 = conn
            .del(self.counter_key(key))
            .await
            .map_err(|e| format!("Failed to reset rate limit: {}", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn limiter() -> RedisRateLimiter {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        RedisRateLimiter::connect(&url, &format!("ap:test:{}", uuid::Uuid::new_v4().simple()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_invalid_url_is_config_error() {
        let result = RedisRateLimiter::connect("not a url", "ap:rl").await;
        assert!(matches!(result, Err(InfrastructureError::Config(_))));
    }

    #[tokio::test]
    #[ignore] // Requires a running Redis
    async fn test_fixed_window() {
        let limiter = limiter().await;
        let limit = RouteLimit::per_minute(2);

        let first = limiter.hit("resend:1.2.3.4", limit).await.unwrap();
        assert!(first.allowed);
        assert_eq!(first.remaining, 1);
        assert!(limiter.hit("resend:1.2.3.4", limit).await.unwrap().allowed);

        let denied = limiter.hit("resend:1.2.3.4", limit).await.unwrap();
        assert!(!denied.allowed);
        assert!(denied.retry_after_seconds > 0 && denied.retry_after_seconds <= 60);

        limiter.reset("resend:1.2.3.4").await.unwrap();
        assert!(limiter.hit("resend:1.2.3.4", limit).await.unwrap().allowed);
    }
}
