//! Magic link repository trait defining the interface for link token persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::magic_link::MagicLinkToken;
use crate::errors::DomainError;

/// Repository trait for MagicLinkToken persistence operations
///
/// Counters and state changes are expressed as single statements so the
/// store's row-level guarantees make concurrent presentations safe.
///
/// # Security Considerations
/// - Only hashes are ever stored or queried
/// - `increment_fail_count` must be an atomic `fail_count = fail_count + 1`
#[async_trait]
pub trait MagicLinkRepository: Send + Sync {
    /// Save a newly issued token
    async fn create(&self, token: MagicLinkToken) -> Result<MagicLinkToken, DomainError>;

    /// Find a token by the hash of its raw value
    ///
    /// # Returns
    /// * `Ok(Some(MagicLinkToken))` - Token found, in any state
    /// * `Ok(None)` - No token with this hash
    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<MagicLinkToken>, DomainError>;

    /// Find a token by its ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<MagicLinkToken>, DomainError>;

    /// Atomically increment the failure counter
    ///
    /// # Returns
    /// * `Ok(i32)` - The counter after the increment
    async fn increment_fail_count(&self, id: Uuid) -> Result<i32, DomainError>;

    /// Record a successful use
    async fn mark_used(&self, id: Uuid, used_at: DateTime<Utc>) -> Result<(), DomainError>;

    /// Revoke one token
    ///
    /// # Returns
    /// * `Ok(true)` - Token was revoked by this call
    /// * `Ok(false)` - Token missing or already revoked
    async fn revoke(&self, id: Uuid, revoked_at: DateTime<Utc>) -> Result<bool, DomainError>;

    /// Revoke every live token of an application
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of tokens revoked
    async fn revoke_for_application(
        &self,
        application_id: i64,
        revoked_at: DateTime<Utc>,
    ) -> Result<usize, DomainError>;

    /// Delete tokens that are expired at `now` or revoked
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows deleted
    async fn delete_stale(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;
}
