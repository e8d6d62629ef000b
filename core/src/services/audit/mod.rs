//! Audit service module for recording token, upload and password reset events.

mod service;

pub use service::{AuditService, AuditServiceConfig};
