//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

use super::env_or;

/// Which store keeps the rate limit counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitBackend {
    /// Per-process counters, suitable for a single instance
    Memory,
    /// Shared counters in Redis
    Redis,
}

impl std::str::FromStr for RateLimitBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "in-memory" => Ok(RateLimitBackend::Memory),
            "redis" => Ok(RateLimitBackend::Redis),
            _ => Err(format!("Invalid rate limit backend: {}", s)),
        }
    }
}

/// A fixed window limit for a single route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteLimit {
    /// Requests allowed per window
    pub max_requests: u32,

    /// Window length in seconds
    pub window_seconds: u64,
}

impl RouteLimit {
    /// Limit expressed as requests per minute
    pub const fn per_minute(max_requests: u32) -> Self {
        Self {
            max_requests,
            window_seconds: 60,
        }
    }
}

/// Per-route limits for the public token endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteLimits {
    /// Upload portal status page
    pub status_page: RouteLimit,
    /// Multipart upload
    pub upload: RouteLimit,
    /// Requesting a fresh link for an expired one
    pub resend: RouteLimit,
    /// Deleting an uploaded attachment
    pub delete_attachment: RouteLimit,
    /// Requesting a password reset e-mail
    pub forgot_password: RouteLimit,
    /// Checking or submitting a password reset
    pub reset_password: RouteLimit,
}

impl Default for RouteLimits {
    fn default() -> Self {
        Self {
            status_page: RouteLimit::per_minute(10),
            upload: RouteLimit::per_minute(60),
            resend: RouteLimit::per_minute(3),
            delete_attachment: RouteLimit::per_minute(30),
            forgot_password: RouteLimit::per_minute(5),
            reset_password: RouteLimit::per_minute(10),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Counter store
    pub backend: RateLimitBackend,

    /// Redis URL when the Redis backend is selected
    pub redis_url: String,

    /// Prefix for all counter keys
    pub key_prefix: String,

    /// Route limits
    pub routes: RouteLimits,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            backend: RateLimitBackend::Memory,
            redis_url: String::from("redis://localhost:6379"),
            key_prefix: String::from("ap:rl"),
            routes: RouteLimits::default(),
        }
    }
}

impl RateLimitConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let routes = RouteLimits {
            status_page: RouteLimit::per_minute(env_or("RATE_LIMIT_STATUS_PER_MINUTE", 10)),
            upload: RouteLimit::per_minute(env_or("RATE_LIMIT_UPLOAD_PER_MINUTE", 60)),
            resend: RouteLimit::per_minute(env_or("RATE_LIMIT_RESEND_PER_MINUTE", 3)),
            delete_attachment: RouteLimit::per_minute(env_or("RATE_LIMIT_DELETE_PER_MINUTE", 30)),
            forgot_password: RouteLimit::per_minute(env_or("RATE_LIMIT_FORGOT_PASSWORD_PER_MINUTE", 5)),
            reset_password: RouteLimit::per_minute(env_or("RATE_LIMIT_RESET_PASSWORD_PER_MINUTE", 10)),
        };

        Self {
            enabled: env_or("RATE_LIMIT_ENABLED", defaults.enabled),
            backend: env_or("RATE_LIMIT_BACKEND", defaults.backend),
            redis_url: std::env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            key_prefix: std::env::var("RATE_LIMIT_KEY_PREFIX").unwrap_or(defaults.key_prefix),
            routes,
        }
    }

    /// Configuration with limiting switched off, used by tests
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

fn default_enabled() -> bool {
    true
}
