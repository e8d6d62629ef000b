//! Mock implementation of AuditLogRepository for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::entities::audit::{AuditEventType, AuditLog};
use crate::errors::DomainError;

use super::AuditLogRepository;

/// Mock implementation of AuditLogRepository for testing
pub struct MockAuditLogRepository {
    logs: Arc<Mutex<Vec<AuditLog>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockAuditLogRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            logs: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    /// Set whether operations should fail
    pub fn set_should_fail(&self, should_fail: bool) {
        *lock(&self.should_fail) = should_fail;
    }

    /// Get all stored logs for testing
    pub fn get_all_logs(&self) -> Vec<AuditLog> {
        lock(&self.logs).clone()
    }

    /// Stored logs of one event type
    pub fn logs_of_type(&self, event_type: AuditEventType) -> Vec<AuditLog> {
        lock(&self.logs)
            .iter()
            .filter(|log| log.event_type == event_type)
            .cloned()
            .collect()
    }

    /// Clear all logs
    pub fn clear(&self) {
        lock(&self.logs).clear();
    }
}

impl Default for MockAuditLogRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl AuditLogRepository for MockAuditLogRepository {
    async fn create(&self, audit_log: &AuditLog) -> Result<(), DomainError> {
        if *lock(&self.should_fail) {
            return Err(DomainError::Internal {
                message: "Mock repository error".to_string(),
            });
        }

        lock(&self.logs).push(audit_log.clone());
        Ok(())
    }

}
