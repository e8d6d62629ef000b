//! Database module - MySQL implementations using SQLx
//!
//! This module provides the database access layer:
//! - Connection pool management and migrations
//! - Repository implementations for tokens, applications, attachments,
//!   users and the audit trail

pub mod connection;
pub mod mysql;

// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{
    MySqlApplicationRepository, MySqlAttachmentRepository, MySqlAuditLogRepository,
    MySqlMagicLinkRepository, MySqlPasswordResetRepository, MySqlUserRepository,
};
