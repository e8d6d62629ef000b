//! Audit log repository trait defining the interface for audit log persistence.

use async_trait::async_trait;

use crate::domain::entities::audit::AuditLog;
use crate::errors::DomainError;

/// Repository trait for AuditLog entity persistence operations
///
/// Entries are append-only.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Create a new audit log entry
    ///
    /// # Arguments
    /// * `audit_log` - The audit log entry to persist
    ///
    /// # Returns
    /// * `Ok(())` on successful creation
    /// * `Err(DomainError)` if the operation fails
    async fn create(&self, audit_log: &AuditLog) -> Result<(), DomainError>;

}
