//! Audit service for recording token presentations, uploads and password resets.
//!
//! Writes are dispatched asynchronously by default so that a slow or failing
//! audit store never blocks or fails the request being served.

use std::sync::Arc;

use serde_json::json;
use tokio::task;
use tracing::warn;
use uuid::Uuid;

use crate::domain::entities::audit::{AuditEventType, AuditLog};
use crate::domain::entities::magic_link::MagicLinkToken;
use crate::domain::value_objects::RequestContext;
use crate::errors::{DomainResult, TokenError};
use crate::repositories::AuditLogRepository;

/// Configuration for the audit service
#[derive(Debug, Clone)]
pub struct AuditServiceConfig {
    /// Whether to run audit writes asynchronously
    pub async_writes: bool,
}

impl Default for AuditServiceConfig {
    fn default() -> Self {
        Self {
            async_writes: true,
        }
    }
}

/// Service for recording security relevant events
pub struct AuditService {
    repository: Arc<dyn AuditLogRepository>,
    config: AuditServiceConfig,
}

impl AuditService {
    /// Create a new audit service
    pub fn new(repository: Arc<dyn AuditLogRepository>, config: AuditServiceConfig) -> Self {
        Self { repository, config }
    }

    /// Persist an already built entry
    pub async fn record(&self, audit_log: AuditLog) -> DomainResult<()> {
        self.write_log(audit_log).await
    }

    /// Log the issuance of a magic link
    pub async fn log_magic_link_issued(&self, token: &MagicLinkToken, ctx: &RequestContext) {
        let log = Self::token_log(AuditEventType::MagicLinkIssued, token, ctx)
            .with_event_data(json!({ "scope": token.scope, "expires_at": token.expires_at }));
        self.write_best_effort(log).await;
    }

    /// Log a successful presentation of a magic link
    pub async fn log_magic_link_validated(&self, token: &MagicLinkToken, ctx: &RequestContext) {
        let log = Self::token_log(AuditEventType::MagicLinkValidated, token, ctx);
        self.write_best_effort(log).await;
    }

    /// Log a rejected presentation together with the counter after the increment
    pub async fn log_magic_link_rejected(
        &self,
        token: &MagicLinkToken,
        fail_count: i32,
        error: &TokenError,
        ctx: &RequestContext,
    ) {
        let log = AuditLog::new(AuditEventType::MagicLinkRejected, ctx.ip_or_unknown())
            .with_application(token.application_id)
            .with_token(token.id, fail_count)
            .with_request_context(ctx.ip_address.clone(), ctx.user_agent.clone())
            .with_failure_reason(error.reason());
        self.write_best_effort(log).await;
    }

    /// Log that a link crossed the failure threshold and was revoked
    pub async fn log_magic_link_locked(&self, token: &MagicLinkToken, fail_count: i32, ctx: &RequestContext) {
        let log = AuditLog::new(AuditEventType::MagicLinkLocked, ctx.ip_or_unknown())
            .with_application(token.application_id)
            .with_token(token.id, fail_count)
            .with_request_context(ctx.ip_address.clone(), ctx.user_agent.clone())
            .with_failure_reason(TokenError::TooManyAttempts.reason());
        self.write_best_effort(log).await;
    }

    /// Log a manual revocation of one or all links of an application
    pub async fn log_magic_link_revoked(
        &self,
        application_id: i64,
        token_id: Option<Uuid>,
        revoked: usize,
        ctx: &RequestContext,
    ) {
        let mut log = AuditLog::new(AuditEventType::MagicLinkRevoked, ctx.ip_or_unknown())
            .with_application(application_id)
            .with_request_context(ctx.ip_address.clone(), ctx.user_agent.clone())
            .with_event_data(json!({ "revoked": revoked }));
        log.token_id = token_id;
        self.write_best_effort(log).await;
    }

    /// Log that a fresh link was sent in place of a presented one
    pub async fn log_magic_link_resent(&self, previous: &MagicLinkToken, issued: &MagicLinkToken, ctx: &RequestContext) {
        let log = Self::token_log(AuditEventType::MagicLinkResent, previous, ctx)
            .with_event_data(json!({ "new_token_id": issued.id }));
        self.write_best_effort(log).await;
    }

    /// Log the outcome of an upload request
    pub async fn log_upload(
        &self,
        application_id: i64,
        file_count: usize,
        total_bytes: u64,
        failure_reason: Option<&str>,
        ctx: &RequestContext,
    ) {
        let event = if failure_reason.is_some() {
            AuditEventType::UploadRejected
        } else {
            AuditEventType::UploadAccepted
        };
        let mut log = AuditLog::new(event, ctx.ip_or_unknown())
            .with_application(application_id)
            .with_request_context(ctx.ip_address.clone(), ctx.user_agent.clone())
            .with_event_data(json!({ "files": file_count, "bytes": total_bytes }));
        if let Some(reason) = failure_reason {
            log = log.with_failure_reason(reason);
        }
        self.write_best_effort(log).await;
    }

    pub async fn log_attachment_deleted(&self, application_id: i64, attachment_id: i64, ctx: &RequestContext) {
        let log = AuditLog::new(AuditEventType::AttachmentDeleted, ctx.ip_or_unknown())
            .with_application(application_id)
            .with_request_context(ctx.ip_address.clone(), ctx.user_agent.clone())
            .with_event_data(json!({ "attachment_id": attachment_id }));
        self.write_best_effort(log).await;
    }

    /// Log a password reset event
    ///
    /// The user is only attached when the account exists; rejected requests
    /// carry the failure reason instead.
    pub async fn log_password_reset(
        &self,
        event_type: AuditEventType,
        user_id: Option<i64>,
        failure_reason: Option<&str>,
        ctx: &RequestContext,
    ) {
        let mut log = AuditLog::new(event_type, ctx.ip_or_unknown())
            .with_request_context(ctx.ip_address.clone(), ctx.user_agent.clone());
        if let Some(id) = user_id {
            log = log.with_user(id);
        }
        if let Some(reason) = failure_reason {
            log = log.with_failure_reason(reason);
        }
        self.write_best_effort(log).await;
    }

    /// Log a rate limit exceeded event
    pub async fn log_rate_limit_exceeded(&self, route: &str, ctx: &RequestContext) {
        let log = AuditLog::new(AuditEventType::RateLimitExceeded, ctx.ip_or_unknown())
            .with_request_context(ctx.ip_address.clone(), ctx.user_agent.clone())
            .with_failure_reason("rate_limited")
            .with_event_data(json!({ "route": route }));
        self.write_best_effort(log).await;
    }

    fn token_log(event_type: AuditEventType, token: &MagicLinkToken, ctx: &RequestContext) -> AuditLog {
        AuditLog::new(event_type, ctx.ip_or_unknown())
            .with_application(token.application_id)
            .with_token(token.id, token.fail_count)
            .with_request_context(ctx.ip_address.clone(), ctx.user_agent.clone())
    }

    /// Audit failures are logged and never surface to the caller
    async fn write_best_effort(&self, audit_log: AuditLog) {
        if let Err(e) = self.write_log(audit_log).await {
            warn!(error = %e, "Failed to write audit log");
        }
    }

    /// Write audit log to repository
    async fn write_log(&self, audit_log: AuditLog) -> DomainResult<()> {
        if self.config.async_writes {
            let repository = Arc::clone(&self.repository);
            task::spawn(async move {
                if let Err(e) = repository.create(&audit_log).await {
                    warn!(
                        error = %e,
                        event = audit_log.event_type.as_str(),
                        "Failed to write audit log"
                    );
                }
            });
            Ok(())
        } else {
            self.repository.create(&audit_log).await
        }
    }
}
