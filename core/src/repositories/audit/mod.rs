//! Audit log repository module.

mod r#trait;
pub use r#trait::AuditLogRepository;

#[cfg(any(test, feature = "test-utils"))]
mod mock;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockAuditLogRepository;
