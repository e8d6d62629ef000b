//! Attachment repository trait for documents stored against applications.

use async_trait::async_trait;

use crate::domain::entities::attachment::{Attachment, AttachmentUsage, NewAttachment};
use crate::errors::DomainError;

/// Repository trait for Attachment persistence operations
#[async_trait]
pub trait AttachmentRepository: Send + Sync {
    /// Insert a batch of attachments in one transaction
    ///
    /// # Returns
    /// * `Ok(Vec<Attachment>)` - Stored rows in input order
    /// * `Err(DomainError)` - Nothing was stored
    async fn create_many(&self, attachments: Vec<NewAttachment>) -> Result<Vec<Attachment>, DomainError>;

    /// Find an attachment by ID
    async fn find_by_id(&self, id: i64) -> Result<Option<Attachment>, DomainError>;

    /// All attachments of an application, newest first
    async fn list_by_application(&self, application_id: i64) -> Result<Vec<Attachment>, DomainError>;

    /// File count and stored bytes of an application
    async fn usage_for_application(&self, application_id: i64) -> Result<AttachmentUsage, DomainError>;

    /// Delete one attachment row
    ///
    /// # Returns
    /// * `Ok(true)` - Row deleted
    /// * `Ok(false)` - No such row
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
}
