//! Single-use password reset links for internal users.

use std::sync::Arc;

use ap_shared::password::password_policy_error;
use ap_shared::url::join_public_url;
use chrono::Utc;
use tokio::task;
use tracing::{debug, info, warn};

use crate::domain::entities::audit::AuditEventType;
use crate::domain::entities::password_reset::PasswordResetToken;
use crate::domain::entities::user::User;
use crate::domain::value_objects::RequestContext;
use crate::errors::{DomainError, DomainResult, TokenError, ValidationError};
use crate::repositories::{PasswordResetRepository, UserRepository};
use crate::services::audit::AuditService;
use crate::services::delivery::{LinkDeliveryTrait, PasswordResetMessage};

use super::config::PasswordResetServiceConfig;
use super::hasher::TokenHasher;

pub struct PasswordResetService {
    repository: Arc<dyn PasswordResetRepository>,
    users: Arc<dyn UserRepository>,
    delivery: Arc<dyn LinkDeliveryTrait>,
    audit: Arc<AuditService>,
    hasher: TokenHasher,
    config: PasswordResetServiceConfig,
    public_base_url: Option<String>,
}

impl PasswordResetService {
    pub fn new(
        repository: Arc<dyn PasswordResetRepository>,
        users: Arc<dyn UserRepository>,
        delivery: Arc<dyn LinkDeliveryTrait>,
        audit: Arc<AuditService>,
        hasher: TokenHasher,
        config: PasswordResetServiceConfig,
        public_base_url: Option<String>,
    ) -> Self {
        Self {
            repository,
            users,
            delivery,
            audit,
            hasher,
            config,
            public_base_url,
        }
    }

    /// Start a reset for an e-mail address
    ///
    /// Succeeds whether or not an account exists. Earlier unused links of the
    /// account are invalidated before the new one is issued, and delivery
    /// problems are only logged.
    pub async fn request_reset(&self, email: &str, ctx: &RequestContext) -> DomainResult<()> {
        let email = User::normalize_email(email);
        if email.is_empty() {
            return Ok(());
        }

        let user = match self.users.find_by_email(&email).await? {
            Some(user) if user.can_reset_password() => user,
            _ => {
                debug!("Password reset requested for unknown or inactive account");
                self.audit
                    .log_password_reset(AuditEventType::PasswordResetRequested, None, Some("unknown_account"), ctx)
                    .await;
                return Ok(());
            }
        };

        let now = Utc::now();
        let invalidated = self.repository.invalidate_for_user(user.id, now).await?;

        let token = TokenHasher::generate_token()?;
        let record = PasswordResetToken::new(user.id, self.hasher.hash(&token)?, self.config.ttl_hours);
        let record = self.repository.create(record).await?;

        let message = PasswordResetMessage {
            recipient: user.email.clone(),
            url: join_public_url(self.public_base_url.as_deref(), &format!("/reset-password/{}", token)),
            expires_at: record.expires_at,
        };
        match self.delivery.deliver_password_reset(&message).await {
            Ok(message_id) => info!(user_id = user.id, invalidated, %message_id, "Password reset link sent"),
            Err(e) => warn!(user_id = user.id, error = %e, "Password reset delivery failed"),
        }

        self.audit
            .log_password_reset(AuditEventType::PasswordResetRequested, Some(user.id), None, ctx)
            .await;
        Ok(())
    }

    /// Resolve a presented reset token that is still usable
    pub async fn lookup(&self, token: &str) -> DomainResult<PasswordResetToken> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::NotFound.into());
        }

        let record = self
            .repository
            .find_by_hash(&self.hasher.hash(token)?)
            .await?
            .ok_or(TokenError::NotFound)?;

        if record.is_used() {
            return Err(TokenError::AlreadyUsed.into());
        }
        if record.is_expired_at(Utc::now()) {
            return Err(TokenError::Expired.into());
        }
        Ok(record)
    }

    /// Redeem a reset token and set the new password
    ///
    /// The token is claimed with a conditional update, so of two concurrent
    /// redemptions exactly one succeeds.
    pub async fn reset_password(
        &self,
        token: &str,
        password: &str,
        confirmation: &str,
        ctx: &RequestContext,
    ) -> DomainResult<()> {
        let record = match self.lookup(token).await {
            Ok(record) => record,
            Err(e) => {
                if let DomainError::Token(ref token_error) = e {
                    self.audit
                        .log_password_reset(
                            AuditEventType::PasswordResetRejected,
                            None,
                            Some(token_error.reason()),
                            ctx,
                        )
                        .await;
                }
                return Err(e);
            }
        };

        let password = password.trim();
        if let Some(message) = password_policy_error(password) {
            return Err(ValidationError::PasswordPolicy {
                message: message.to_string(),
            }
            .into());
        }
        if password != confirmation.trim() {
            return Err(ValidationError::PasswordMismatch.into());
        }

        let user = self
            .users
            .find_by_id(record.user_id)
            .await?
            .ok_or(TokenError::NotFound)?;

        let password_hash = self.hash_password(password).await?;

        if !self.repository.claim(record.id, Utc::now()).await? {
            warn!(user_id = user.id, token_id = %record.id, "Password reset token redeemed concurrently");
            self.audit
                .log_password_reset(
                    AuditEventType::PasswordResetRejected,
                    Some(user.id),
                    Some(TokenError::AlreadyUsed.reason()),
                    ctx,
                )
                .await;
            return Err(TokenError::AlreadyUsed.into());
        }

        self.users.update_password_hash(user.id, &password_hash).await?;

        info!(user_id = user.id, "Password reset completed");
        self.audit
            .log_password_reset(AuditEventType::PasswordResetCompleted, Some(user.id), None, ctx)
            .await;
        Ok(())
    }

    async fn hash_password(&self, password: &str) -> DomainResult<String> {
        let password = password.to_string();
        let cost = self.config.bcrypt_cost;
        task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Password hashing task failed: {}", e),
            })?
            .map_err(|e| DomainError::Internal {
                message: format!("Password hashing failed: {}", e),
            })
    }
}
