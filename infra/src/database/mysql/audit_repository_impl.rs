//! MySQL implementation of the AuditLogRepository trait.
//!
//! Entries are append-only.

use async_trait::async_trait;
use sqlx::MySqlPool;

use ap_core::domain::entities::audit::AuditLog;
use ap_core::errors::DomainError;
use ap_core::repositories::AuditLogRepository;

use super::query_error;

/// MySQL implementation of AuditLogRepository
pub struct MySqlAuditLogRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlAuditLogRepository {
    /// Create a new MySQL audit log repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogRepository for MySqlAuditLogRepository {
    async fn create(&self, audit_log: &AuditLog) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO audit_logs (
                id, event_type, application_id, user_id, token_id, fail_count,
                ip_address, user_agent, failure_reason, event_data, success, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        let event_data_json = audit_log
            .event_data
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to serialize event_data: {}", e),
            })?;

        sqlx::query(query)
            .bind(audit_log.id.to_string())
            .bind(audit_log.event_type.as_str())
            .bind(audit_log.application_id)
            .bind(audit_log.user_id)
            .bind(audit_log.token_id.map(|id| id.to_string()))
            .bind(audit_log.fail_count)
            .bind(&audit_log.ip_address)
            .bind(&audit_log.user_agent)
            .bind(&audit_log.failure_reason)
            .bind(event_data_json)
            .bind(audit_log.success)
            .bind(audit_log.created_at)
            .execute(&self.pool)
            .await
            .map_err(query_error("create audit log"))?;

        Ok(())
    }
}
