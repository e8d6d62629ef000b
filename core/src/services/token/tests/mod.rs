mod cleanup_tests;
mod dispatch_tests;

use std::sync::Arc;

use crate::repositories::MockAuditLogRepository;
use crate::services::audit::{AuditService, AuditServiceConfig};

pub(super) const SECRET: &str = "test-hmac-secret";
pub(super) const SCOPE: &str = "upload_documents";

/// Audit service writing synchronously into a mock
pub(super) fn audit() -> (Arc<AuditService>, Arc<MockAuditLogRepository>) {
    let repo = Arc::new(MockAuditLogRepository::new());
    let service = AuditService::new(
        repo.clone(),
        AuditServiceConfig { async_writes: false },
    );
    (Arc::new(service), repo)
}
