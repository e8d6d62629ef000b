//! Rate limit counter stores

pub mod memory;
#[cfg(feature = "redis-cache")]
pub mod redis_store;

use std::sync::Arc;

use ap_core::services::RateLimiterTrait;
use ap_shared::config::{RateLimitBackend, RateLimitConfig};
use tracing::info;

use crate::InfrastructureError;

pub use memory::MemoryRateLimiter;
#[cfg(feature = "redis-cache")]
pub use redis_store::RedisRateLimiter;

/// Build the configured counter store
pub async fn create_rate_limiter(config: &RateLimitConfig) -> Result<Arc<dyn RateLimiterTrait>, InfrastructureError> {
    match config.backend {
        RateLimitBackend::Memory => {
            info!("Using in-memory rate limit counters");
            Ok(Arc::new(MemoryRateLimiter::new()))
        }
        #[cfg(feature = "redis-cache")]
        RateLimitBackend::Redis => {
            let limiter = RedisRateLimiter::connect(&config.redis_url, &config.key_prefix).await?;
            Ok(Arc::new(limiter))
        }
        #[cfg(not(feature = "redis-cache"))]
        RateLimitBackend::Redis => Err(InfrastructureError::Config(
            "Redis rate limiting requires the redis-cache feature".to_string(),
        )),
    }
}
