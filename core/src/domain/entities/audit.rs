//! Audit log entity for recording token and upload security events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Event types recorded for the magic link and password reset flows
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEventType {
    // Magic link lifecycle
    MagicLinkIssued,
    MagicLinkValidated,
    MagicLinkRejected,
    MagicLinkLocked,
    MagicLinkRevoked,
    MagicLinkResent,

    // Uploads
    UploadAccepted,
    UploadRejected,
    AttachmentDeleted,

    // Password reset
    PasswordResetRequested,
    PasswordResetCompleted,
    PasswordResetRejected,

    // Rate limiting
    RateLimitExceeded,
}

impl AuditEventType {
    /// Convert to string representation for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MagicLinkIssued => "MAGIC_LINK_ISSUED",
            Self::MagicLinkValidated => "MAGIC_LINK_VALIDATED",
            Self::MagicLinkRejected => "MAGIC_LINK_REJECTED",
            Self::MagicLinkLocked => "MAGIC_LINK_LOCKED",
            Self::MagicLinkRevoked => "MAGIC_LINK_REVOKED",
            Self::MagicLinkResent => "MAGIC_LINK_RESENT",
            Self::UploadAccepted => "UPLOAD_ACCEPTED",
            Self::UploadRejected => "UPLOAD_REJECTED",
            Self::AttachmentDeleted => "ATTACHMENT_DELETED",
            Self::PasswordResetRequested => "PASSWORD_RESET_REQUESTED",
            Self::PasswordResetCompleted => "PASSWORD_RESET_COMPLETED",
            Self::PasswordResetRejected => "PASSWORD_RESET_REJECTED",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
        }
    }

    /// Whether the event records a failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::MagicLinkRejected
                | Self::MagicLinkLocked
                | Self::UploadRejected
                | Self::PasswordResetRejected
                | Self::RateLimitExceeded
        )
    }
}

/// Represents an audit log entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditLog {
    /// Unique identifier for the log entry
    pub id: Uuid,

    /// Type of event
    pub event_type: AuditEventType,

    /// Application concerned, for magic link and upload events
    pub application_id: Option<i64>,

    /// Internal user concerned, for password reset events
    pub user_id: Option<i64>,

    /// Token record involved
    pub token_id: Option<Uuid>,

    /// Failure counter of the token at the time of the event
    pub fail_count: Option<i32>,

    /// IP address of the request
    pub ip_address: String,

    /// User agent string from the request
    pub user_agent: Option<String>,

    /// Failure reason for rejected attempts
    pub failure_reason: Option<String>,

    /// Additional event data in JSON format
    pub event_data: Option<JsonValue>,

    /// Whether the action succeeded
    pub success: bool,

    /// Timestamp when the event occurred
    pub created_at: DateTime<Utc>,
}

impl AuditLog {
    /// Create a new audit log entry
    pub fn new(event_type: AuditEventType, ip_address: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type,
            application_id: None,
            user_id: None,
            token_id: None,
            fail_count: None,
            ip_address: ip_address.into(),
            user_agent: None,
            failure_reason: None,
            event_data: None,
            success: !event_type.is_failure(),
            created_at: Utc::now(),
        }
    }

    pub fn with_application(mut self, application_id: i64) -> Self {
        self.application_id = Some(application_id);
        self
    }

    pub fn with_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Add token context together with its current failure counter
    pub fn with_token(mut self, token_id: Uuid, fail_count: i32) -> Self {
        self.token_id = Some(token_id);
        self.fail_count = Some(fail_count);
        self
    }

    /// Add request context (IP and User Agent)
    pub fn with_request_context(mut self, ip_address: Option<String>, user_agent: Option<String>) -> Self {
        if let Some(ip) = ip_address {
            self.ip_address = ip;
        }
        self.user_agent = user_agent;
        self
    }

    /// Add failure reason for failed attempts
    pub fn with_failure_reason(mut self, reason: impl Into<String>) -> Self {
        self.failure_reason = Some(reason.into());
        self.success = false;
        self
    }

    /// Add event data as JSON
    pub fn with_event_data(mut self, data: JsonValue) -> Self {
        self.event_data = Some(data);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_follows_event_type() {
        assert!(AuditLog::new(AuditEventType::MagicLinkIssued, "127.0.0.1").success);
        assert!(!AuditLog::new(AuditEventType::MagicLinkRejected, "127.0.0.1").success);
    }

    #[test]
    fn test_builder_sets_token_context() {
        let token_id = Uuid::new_v4();
        let log = AuditLog::new(AuditEventType::MagicLinkRejected, "10.0.0.1")
            .with_application(9)
            .with_token(token_id, 4)
            .with_failure_reason("expired");

        assert_eq!(log.application_id, Some(9));
        assert_eq!(log.token_id, Some(token_id));
        assert_eq!(log.fail_count, Some(4));
        assert_eq!(log.failure_reason.as_deref(), Some("expired"));
        assert!(!log.success);
    }
}
