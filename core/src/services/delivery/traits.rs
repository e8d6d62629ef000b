//! Traits for link delivery integration

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Upload link addressed to a candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicLinkMessage {
    pub recipient: String,
    pub candidate_name: Option<String>,
    pub job_title: Option<String>,
    pub reference: String,
    /// Absolute (or root relative) link carrying the raw token
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

/// Reset link addressed to an internal user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetMessage {
    pub recipient: String,
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

/// Trait for e-mail (or other channel) delivery of links
///
/// Implementations receive the raw token inside `url` and must never log it
/// unmasked.
#[async_trait]
pub trait LinkDeliveryTrait: Send + Sync {
    /// Send an upload link, returning a provider message id
    async fn deliver_magic_link(&self, message: &MagicLinkMessage) -> Result<String, String>;
    /// Send a password reset link, returning a provider message id
    async fn deliver_password_reset(&self, message: &PasswordResetMessage) -> Result<String, String>;
}
