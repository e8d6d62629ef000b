//! Configuration for the magic link and password reset services

use ap_shared::{CleanupConfig, MagicLinkConfig, PasswordResetConfig};

use crate::domain::entities::{DEFAULT_MAGIC_LINK_TTL_HOURS, DEFAULT_MAX_FAILURES, DEFAULT_PASSWORD_RESET_TTL_HOURS};

/// Configuration for the magic link service
#[derive(Debug, Clone)]
pub struct MagicLinkServiceConfig {
    /// Link lifetime in hours
    pub ttl_hours: i64,
    /// Scope stamped on issued links and required on presentation
    pub scope: String,
    /// Failed presentations after which a link is locked
    pub max_failures: i32,
}

impl Default for MagicLinkServiceConfig {
    fn default() -> Self {
        Self {
            ttl_hours: DEFAULT_MAGIC_LINK_TTL_HOURS,
            scope: ap_shared::config::SCOPE_UPLOAD_DOCUMENTS.to_string(),
            max_failures: DEFAULT_MAX_FAILURES,
        }
    }
}

impl From<&MagicLinkConfig> for MagicLinkServiceConfig {
    fn from(config: &MagicLinkConfig) -> Self {
        Self {
            ttl_hours: config.ttl_hours,
            scope: config.scope.clone(),
            max_failures: config.max_failures,
        }
    }
}

/// Configuration for the password reset service
#[derive(Debug, Clone)]
pub struct PasswordResetServiceConfig {
    /// Reset link lifetime in hours
    pub ttl_hours: i64,
    /// bcrypt work factor for the new password
    pub bcrypt_cost: u32,
}

impl Default for PasswordResetServiceConfig {
    fn default() -> Self {
        Self {
            ttl_hours: DEFAULT_PASSWORD_RESET_TTL_HOURS,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl From<&PasswordResetConfig> for PasswordResetServiceConfig {
    fn from(config: &PasswordResetConfig) -> Self {
        Self {
            ttl_hours: config.ttl_hours,
            bcrypt_cost: config.bcrypt_cost,
        }
    }
}

/// Configuration for token cleanup service
#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600, // Run every hour
            enabled: true,
        }
    }
}

impl From<&CleanupConfig> for TokenCleanupConfig {
    fn from(config: &CleanupConfig) -> Self {
        Self {
            interval_seconds: config.interval_seconds,
            enabled: config.enabled,
        }
    }
}
