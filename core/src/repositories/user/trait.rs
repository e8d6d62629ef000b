//! User repository trait for the password reset flow.

use async_trait::async_trait;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for internal user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by normalised e-mail address
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No account with this address
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by ID
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError>;

    /// Replace the stored password hash
    async fn update_password_hash(&self, user_id: i64, password_hash: &str) -> Result<(), DomainError>;
}
