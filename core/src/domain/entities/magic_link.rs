//! Magic link token entity granting scoped, time-limited access without login.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default lifetime of an upload link (72 hours)
pub const DEFAULT_MAGIC_LINK_TTL_HOURS: i64 = 72;

/// Default number of failed attempts before a link is locked
pub const DEFAULT_MAX_FAILURES: i32 = 10;

/// Stored record of an issued magic link.
///
/// Only the keyed hash of the secret is kept; the secret itself is handed
/// out once inside the link URL and cannot be recovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagicLinkToken {
    /// Unique identifier for the token
    pub id: Uuid,

    /// Application the link grants access to
    pub application_id: i64,

    /// Hex encoded HMAC-SHA256 of the raw token
    #[serde(skip_serializing)]
    pub token_hash: String,

    /// Purpose the link was issued for
    pub scope: String,

    /// Instant from which the link is no longer valid
    pub expires_at: DateTime<Utc>,

    /// Set when the link was revoked manually or by the lock
    pub revoked_at: Option<DateTime<Utc>>,

    /// Last successful use
    pub last_used_at: Option<DateTime<Utc>>,

    /// Failed presentations of this link
    pub fail_count: i32,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,
}

impl MagicLinkToken {
    /// Creates a new token record expiring `ttl_hours` from now
    pub fn new(application_id: i64, token_hash: String, scope: impl Into<String>, ttl_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            application_id,
            token_hash,
            scope: scope.into(),
            expires_at: now + Duration::hours(ttl_hours),
            revoked_at: None,
            last_used_at: None,
            fail_count: 0,
            created_at: now,
        }
    }

    /// A link presented at or after `expires_at` is expired
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Whether enough failures have accumulated to lock the link
    pub fn is_locked(&self, max_failures: i32) -> bool {
        self.fail_count >= max_failures
    }

    /// Whole hours left before expiry, never negative
    pub fn hours_remaining_at(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_hours().max(0)
    }

    /// Eligible for removal by the cleanup job
    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        self.is_expired_at(now) || self.is_revoked()
    }
}
