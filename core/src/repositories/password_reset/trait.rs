//! Password reset token persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::password_reset::PasswordResetToken;
use crate::errors::DomainError;

#[async_trait]
pub trait PasswordResetRepository: Send + Sync {
    /// Save a newly issued reset token
    async fn create(&self, token: PasswordResetToken) -> Result<PasswordResetToken, DomainError>;

    /// Find a token by the hash of its raw value
    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<PasswordResetToken>, DomainError>;

    /// Atomically mark the token used if nobody did so before
    ///
    /// # Returns
    /// * `Ok(true)` - This call redeemed the token
    /// * `Ok(false)` - The token was already used (or does not exist)
    async fn claim(&self, id: Uuid, used_at: DateTime<Utc>) -> Result<bool, DomainError>;

    /// Mark every unused token of a user as used, e.g. before issuing a new one
    async fn invalidate_for_user(&self, user_id: i64, used_at: DateTime<Utc>) -> Result<usize, DomainError>;

    /// Delete tokens that are expired at `now` or already used
    async fn delete_stale(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;
}
