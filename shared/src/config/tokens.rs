//! Magic link, password reset and token cleanup configuration

use serde::{Deserialize, Serialize};

use super::env_or;

/// Scope carried by links that allow candidates to upload documents
pub const SCOPE_UPLOAD_DOCUMENTS: &str = "upload_documents";

/// Magic link issuance and validation settings
#[derive(Clone, Deserialize, Serialize)]
pub struct MagicLinkConfig {
    /// HMAC key for hashing link tokens
    pub hmac_secret: String,

    /// Lifetime of a freshly issued link in hours
    pub ttl_hours: i64,

    /// Scope stamped on links issued for document uploads
    pub scope: String,

    /// Failed attempts after which a link is locked and revoked
    pub max_failures: i32,
}

impl Default for MagicLinkConfig {
    fn default() -> Self {
        Self {
            hmac_secret: String::new(),
            ttl_hours: 72,
            scope: SCOPE_UPLOAD_DOCUMENTS.to_string(),
            max_failures: 10,
        }
    }
}

impl std::fmt::Debug for MagicLinkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MagicLinkConfig")
            .field("hmac_secret", &"<redacted>")
            .field("ttl_hours", &self.ttl_hours)
            .field("scope", &self.scope)
            .field("max_failures", &self.max_failures)
            .finish()
    }
}

impl MagicLinkConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            hmac_secret: std::env::var("MAGIC_LINK_HMAC_SECRET").unwrap_or_default(),
            ttl_hours: env_or("MAGIC_LINK_TTL_HOURS", defaults.ttl_hours),
            max_failures: env_or("MAGIC_LINK_MAX_FAILURES", defaults.max_failures),
            ..defaults
        }
    }

    /// Config with an explicit secret, other fields default
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            hmac_secret: secret.into(),
            ..Default::default()
        }
    }
}

/// Password reset token settings
#[derive(Clone, Deserialize, Serialize)]
pub struct PasswordResetConfig {
    /// HMAC key for reset tokens; falls back to the magic link secret when unset
    pub hmac_secret: String,

    /// Lifetime of a reset link in hours
    pub ttl_hours: i64,

    /// bcrypt cost for the new password hash
    pub bcrypt_cost: u32,
}

impl Default for PasswordResetConfig {
    fn default() -> Self {
        Self {
            hmac_secret: String::new(),
            ttl_hours: 2,
            bcrypt_cost: 12,
        }
    }
}

impl std::fmt::Debug for PasswordResetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordResetConfig")
            .field("hmac_secret", &"<redacted>")
            .field("ttl_hours", &self.ttl_hours)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl PasswordResetConfig {
    /// Create from environment variables
    pub fn from_env(magic_link_secret: &str) -> Self {
        let defaults = Self::default();
        let hmac_secret = std::env::var("PASSWORD_RESET_HMAC_SECRET")
            .ok()
            .filter(|secret| !secret.trim().is_empty())
            .unwrap_or_else(|| magic_link_secret.to_string());

        Self {
            hmac_secret,
            ttl_hours: env_or("PASSWORD_RESET_TTL_HOURS", defaults.ttl_hours),
            bcrypt_cost: env_or("PASSWORD_RESET_BCRYPT_COST", defaults.bcrypt_cost),
        }
    }
}

/// Background cleanup of expired tokens
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CleanupConfig {
    /// Run the periodic task inside the API process
    pub enabled: bool,

    /// Seconds between cleanup runs
    pub interval_seconds: u64,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 3600,
        }
    }
}

impl CleanupConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_or("TOKEN_CLEANUP_ENABLED", defaults.enabled),
            interval_seconds: env_or("TOKEN_CLEANUP_INTERVAL_SECONDS", defaults.interval_seconds),
        }
    }
}
