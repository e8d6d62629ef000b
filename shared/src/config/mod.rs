//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical business areas:
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `rate_limit` - Per-route limits for the public token endpoints
//! - `server` - HTTP server, public URL and CORS configuration
//! - `storage` - Document storage backend
//! - `tokens` - Magic link, password reset and cleanup settings
//! - `upload` - Upload byte and file count budgets

pub mod database;
pub mod environment;
pub mod rate_limit;
pub mod server;
pub mod storage;
pub mod tokens;
pub mod upload;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use rate_limit::{RateLimitBackend, RateLimitConfig, RouteLimit, RouteLimits};
pub use server::{CorsConfig, ServerConfig};
pub use storage::{StorageConfig, StorageMode};
pub use tokens::{CleanupConfig, MagicLinkConfig, PasswordResetConfig, SCOPE_UPLOAD_DOCUMENTS};
pub use upload::UploadConfig;

/// Secrets that are only acceptable on a developer machine
const INSECURE_SECRETS: &[&str] = &["dev-secret-change-me", "dev-change-me", "dev-hmac-secret", ""];

/// Fallback HMAC key used in development when none is configured
pub const DEV_HMAC_SECRET: &str = "dev-change-me";

/// Configuration errors raised while loading or validating settings
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be set to a non-default value in {environment}")]
    InsecureSecret { name: &'static str, environment: Environment },

    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },

    #[error("storage backend {0:?} is missing required settings")]
    StorageNotConfigured(StorageMode),
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Magic link configuration
    pub magic_link: MagicLinkConfig,

    /// Password reset configuration
    pub password_reset: PasswordResetConfig,

    /// Token cleanup configuration
    pub cleanup: CleanupConfig,

    /// Upload limits
    pub upload: UploadConfig,

    /// Storage backend
    pub storage: StorageConfig,

    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            magic_link: MagicLinkConfig::with_secret(DEV_HMAC_SECRET),
            password_reset: PasswordResetConfig {
                hmac_secret: DEV_HMAC_SECRET.to_string(),
                ..Default::default()
            },
            cleanup: CleanupConfig::default(),
            upload: UploadConfig::default(),
            storage: StorageConfig::default(),
            rate_limit: RateLimitConfig::default(),
            cors: CorsConfig::development(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();

        let mut magic_link = MagicLinkConfig::from_env();
        if magic_link.hmac_secret.trim().is_empty() && !environment.enforces_secrets() {
            magic_link.hmac_secret = DEV_HMAC_SECRET.to_string();
        }
        let password_reset = PasswordResetConfig::from_env(&magic_link.hmac_secret);

        let storage = StorageConfig::from_env()
            .map_err(|reason| ConfigError::InvalidValue { name: "STORAGE_MODE", reason })?;

        let cors = if environment.is_development() {
            CorsConfig::development()
        } else {
            CorsConfig::from_env()
        };

        Ok(Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            magic_link,
            password_reset,
            cleanup: CleanupConfig::from_env(),
            upload: UploadConfig::from_env(),
            storage,
            rate_limit: RateLimitConfig::from_env(),
            cors,
            logging: LoggingConfig::from_env(environment),
        })
    }

    /// Reject settings that are unsafe or incomplete for the current environment
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.magic_link.ttl_hours <= 0 {
            return Err(ConfigError::InvalidValue {
                name: "MAGIC_LINK_TTL_HOURS",
                reason: "must be positive".to_string(),
            });
        }
        if self.password_reset.ttl_hours <= 0 {
            return Err(ConfigError::InvalidValue {
                name: "PASSWORD_RESET_TTL_HOURS",
                reason: "must be positive".to_string(),
            });
        }
        if self.magic_link.max_failures <= 0 {
            return Err(ConfigError::InvalidValue {
                name: "MAGIC_LINK_MAX_FAILURES",
                reason: "must be positive".to_string(),
            });
        }
        if !self.storage.is_configured() {
            return Err(ConfigError::StorageNotConfigured(self.storage.mode));
        }

        if self.environment.enforces_secrets() {
            if is_insecure_secret(&self.magic_link.hmac_secret) {
                return Err(ConfigError::InsecureSecret {
                    name: "MAGIC_LINK_HMAC_SECRET",
                    environment: self.environment,
                });
            }
            if is_insecure_secret(&self.password_reset.hmac_secret) {
                return Err(ConfigError::InsecureSecret {
                    name: "PASSWORD_RESET_HMAC_SECRET",
                    environment: self.environment,
                });
            }
            if self.server.internal_api_key.trim().is_empty() {
                return Err(ConfigError::InsecureSecret {
                    name: "INTERNAL_API_KEY",
                    environment: self.environment,
                });
            }
        }

        Ok(())
    }
}

fn is_insecure_secret(secret: &str) -> bool {
    INSECURE_SECRETS.contains(&secret.trim())
}

/// Parse an environment variable, falling back to `default` when unset or malformed
pub(crate) fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Comma separated environment variable, empty entries dropped
pub(crate) fn env_list(name: &str) -> Vec<String> {
    std::env::var(name)
        .map(|value| {
            value
                .split(',')
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect()
        })
        .unwrap_or_default()
}
