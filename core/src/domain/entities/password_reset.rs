//! Single-use password reset token entity.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default lifetime of a reset link (2 hours)
pub const DEFAULT_PASSWORD_RESET_TTL_HOURS: i64 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetToken {
    pub id: Uuid,

    /// Account the reset applies to
    pub user_id: i64,

    /// Hex encoded HMAC-SHA256 of the raw token
    #[serde(skip_serializing)]
    pub token_hash: String,

    pub expires_at: DateTime<Utc>,

    /// Set once the token has been redeemed
    pub used_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    pub fn new(user_id: i64, token_hash: String, ttl_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            expires_at: now + Duration::hours(ttl_hours),
            used_at: None,
            created_at: now,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    /// Neither used nor expired
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_used() && !self.is_expired_at(now)
    }
}
