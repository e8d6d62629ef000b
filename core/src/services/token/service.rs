//! Magic link lifecycle: issuance, presentation and revocation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::magic_link::MagicLinkToken;
use crate::domain::value_objects::RequestContext;
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::MagicLinkRepository;
use crate::services::audit::AuditService;

use super::config::MagicLinkServiceConfig;
use super::hasher::TokenHasher;

/// A freshly issued link. The raw token exists only here.
#[derive(Debug, Clone)]
pub struct IssuedMagicLink {
    pub token: String,
    pub record: MagicLinkToken,
}

impl IssuedMagicLink {
    /// Portal path carrying the raw token
    pub fn path(&self) -> String {
        format!("/r/{}", self.token)
    }
}

/// Service issuing and checking magic links
pub struct MagicLinkService {
    repository: Arc<dyn MagicLinkRepository>,
    hasher: TokenHasher,
    audit: Arc<AuditService>,
    config: MagicLinkServiceConfig,
}

impl MagicLinkService {
    pub fn new(
        repository: Arc<dyn MagicLinkRepository>,
        hasher: TokenHasher,
        audit: Arc<AuditService>,
        config: MagicLinkServiceConfig,
    ) -> Self {
        Self {
            repository,
            hasher,
            audit,
            config,
        }
    }

    pub fn config(&self) -> &MagicLinkServiceConfig {
        &self.config
    }

    /// Issue a new link for an application with the configured scope
    pub async fn issue(&self, application_id: i64, ctx: &RequestContext) -> DomainResult<IssuedMagicLink> {
        let token = TokenHasher::generate_token()?;
        let token_hash = self.hasher.hash(&token)?;
        let record = MagicLinkToken::new(application_id, token_hash, self.config.scope.clone(), self.config.ttl_hours);
        let record = self.repository.create(record).await?;

        info!(
            token_id = %record.id,
            application_id,
            expires_at = %record.expires_at,
            "Magic link issued"
        );
        self.audit.log_magic_link_issued(&record, ctx).await;

        Ok(IssuedMagicLink { token, record })
    }

    /// Check a presented token without recording a use
    ///
    /// Used by read-only views. Failures are counted exactly as in `validate`.
    pub async fn peek(&self, token: &str, scope: &str, ctx: &RequestContext) -> DomainResult<MagicLinkToken> {
        self.authorize(token, scope, ctx).await
    }

    /// Check a presented token and record the successful use
    pub async fn validate(&self, token: &str, scope: &str, ctx: &RequestContext) -> DomainResult<MagicLinkToken> {
        let record = self.authorize(token, scope, ctx).await?;
        self.mark_used(record, ctx).await
    }

    /// Record a successful use of a link resolved earlier with `peek`
    pub async fn mark_used(&self, mut record: MagicLinkToken, ctx: &RequestContext) -> DomainResult<MagicLinkToken> {
        let now = Utc::now();
        self.repository.mark_used(record.id, now).await?;
        record.last_used_at = Some(now);

        debug!(token_id = %record.id, application_id = record.application_id, "Magic link used");
        self.audit.log_magic_link_validated(&record, ctx).await;

        Ok(record)
    }

    /// Resolve a token for a resend request
    ///
    /// Expired links may still be traded for a fresh one; revoked links and
    /// links of another scope may not. No failure is counted here.
    pub async fn find_for_resend(&self, token: &str, scope: &str) -> DomainResult<MagicLinkToken> {
        let record = self.lookup(token).await?.ok_or(TokenError::NotFound)?;
        if record.scope != scope || record.is_revoked() {
            return Err(TokenError::NotFound.into());
        }
        Ok(record)
    }

    /// Revoke one link
    pub async fn revoke(&self, token_id: Uuid, ctx: &RequestContext) -> DomainResult<bool> {
        let record = self
            .repository
            .find_by_id(token_id)
            .await?
            .ok_or(TokenError::NotFound)?;

        let revoked = self.repository.revoke(record.id, Utc::now()).await?;
        if revoked {
            info!(token_id = %record.id, application_id = record.application_id, "Magic link revoked");
            self.audit
                .log_magic_link_revoked(record.application_id, Some(record.id), 1, ctx)
                .await;
        }
        Ok(revoked)
    }

    /// Revoke every live link of an application
    pub async fn revoke_for_application(&self, application_id: i64, ctx: &RequestContext) -> DomainResult<usize> {
        let revoked = self
            .repository
            .revoke_for_application(application_id, Utc::now())
            .await?;

        info!(application_id, revoked, "Magic links revoked for application");
        self.audit
            .log_magic_link_revoked(application_id, None, revoked, ctx)
            .await;
        Ok(revoked)
    }

    /// Whole hours before the link expires
    pub fn hours_remaining(&self, record: &MagicLinkToken) -> i64 {
        record.hours_remaining_at(Utc::now())
    }

    async fn lookup(&self, token: &str) -> DomainResult<Option<MagicLinkToken>> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(None);
        }
        let token_hash = self.hasher.hash(token)?;
        self.repository.find_by_hash(&token_hash).await
    }

    async fn authorize(&self, token: &str, scope: &str, ctx: &RequestContext) -> DomainResult<MagicLinkToken> {
        let record = match self.lookup(token).await? {
            Some(record) => record,
            None => {
                debug!(ip = ctx.ip_or_unknown(), "Unknown magic link presented");
                return Err(TokenError::NotFound.into());
            }
        };

        match self.check(&record, scope, Utc::now()) {
            Ok(()) => Ok(record),
            Err(error) => Err(self.reject(record, error, ctx).await),
        }
    }

    /// State checks in presentation order
    ///
    /// A link of another scope is reported as unknown. A revoked link that
    /// reached the failure limit keeps reporting the lock.
    fn check(&self, record: &MagicLinkToken, scope: &str, now: DateTime<Utc>) -> Result<(), TokenError> {
        if record.scope != scope {
            return Err(TokenError::NotFound);
        }
        if record.is_expired_at(now) {
            return Err(TokenError::Expired);
        }
        let locked = record.is_locked(self.config.max_failures);
        if record.is_revoked() && !locked {
            return Err(TokenError::Revoked);
        }
        if locked {
            return Err(TokenError::TooManyAttempts);
        }
        Ok(())
    }

    /// Count a failed presentation and lock the link at the threshold
    ///
    /// Expired links are counted but never locked, so they can still be
    /// traded for a fresh link.
    async fn reject(&self, record: MagicLinkToken, error: TokenError, ctx: &RequestContext) -> DomainError {
        let fail_count = match self.repository.increment_fail_count(record.id).await {
            Ok(count) => count,
            Err(e) => return e,
        };

        warn!(
            token_id = %record.id,
            application_id = record.application_id,
            fail_count,
            reason = error.reason(),
            ip = ctx.ip_or_unknown(),
            "Magic link rejected"
        );
        self.audit
            .log_magic_link_rejected(&record, fail_count, &error, ctx)
            .await;

        let lockable = !matches!(error, TokenError::Expired) && !record.is_revoked();
        if lockable && fail_count >= self.config.max_failures {
            match self.repository.revoke(record.id, Utc::now()).await {
                Ok(true) => {
                    warn!(
                        token_id = %record.id,
                        application_id = record.application_id,
                        fail_count,
                        "Magic link locked after repeated failures"
                    );
                    self.audit.log_magic_link_locked(&record, fail_count, ctx).await;
                }
                Ok(false) => {}
                Err(e) => return e,
            }
        }

        error.into()
    }
}
