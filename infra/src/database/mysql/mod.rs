//! MySQL implementations of the repository traits.
//!
//! Token and audit ids are stored as `CHAR(36)` strings, every other id is a
//! `BIGINT` key.

use sqlx::mysql::MySqlRow;
use sqlx::{MySql, Row};
use uuid::Uuid;

use ap_core::errors::DomainError;

pub mod application_repository_impl;
pub mod attachment_repository_impl;
pub mod audit_repository_impl;
pub mod magic_link_repository_impl;
pub mod password_reset_repository_impl;
pub mod user_repository_impl;

pub use application_repository_impl::MySqlApplicationRepository;
pub use attachment_repository_impl::MySqlAttachmentRepository;
pub use audit_repository_impl::MySqlAuditLogRepository;
pub use magic_link_repository_impl::MySqlMagicLinkRepository;
pub use password_reset_repository_impl::MySqlPasswordResetRepository;
pub use user_repository_impl::MySqlUserRepository;

/// Read a column, mapping decode failures to an internal error
pub(crate) fn column<'r, T>(row: &'r MySqlRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, MySql> + sqlx::Type<MySql>,
{
    row.try_get(name).map_err(|e| DomainError::Internal {
        message: format!("Failed to get {}: {}", name, e),
    })
}

/// Read a `CHAR(36)` id column
pub(crate) fn uuid_column(row: &MySqlRow, name: &str) -> Result<Uuid, DomainError> {
    let value: String = column(row, name)?;
    Uuid::parse_str(&value).map_err(|e| DomainError::Internal {
        message: format!("Invalid UUID in {}: {}", name, e),
    })
}

/// Wrap a query failure with what was being attempted
pub(crate) fn query_error(action: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::Internal {
        message: format!("Failed to {}: {}", action, e),
    }
}
