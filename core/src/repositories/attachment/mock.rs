//! Mock implementation of AttachmentRepository for testing

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::attachment::{Attachment, AttachmentUsage, NewAttachment};
use crate::errors::DomainError;

use super::r#trait::AttachmentRepository;

pub struct MockAttachmentRepository {
    attachments: Arc<RwLock<BTreeMap<i64, Attachment>>>,
    next_id: AtomicI64,
    fail_inserts: AtomicBool,
}

impl MockAttachmentRepository {
    pub fn new() -> Self {
        Self {
            attachments: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: AtomicI64::new(1),
            fail_inserts: AtomicBool::new(false),
        }
    }

    /// Seed an existing attachment, returning its id
    pub async fn seed(&self, attachment: NewAttachment) -> Attachment {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = attachment.into_attachment(id, Utc::now());
        self.attachments.write().await.insert(id, stored.clone());
        stored
    }

    /// Make subsequent inserts fail, to exercise rollback paths
    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub async fn count(&self) -> usize {
        self.attachments.read().await.len()
    }
}

impl Default for MockAttachmentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttachmentRepository for MockAttachmentRepository {
    async fn create_many(&self, attachments: Vec<NewAttachment>) -> Result<Vec<Attachment>, DomainError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(DomainError::Internal {
                message: "insert failed".to_string(),
            });
        }

        let mut stored = self.attachments.write().await;
        let now = Utc::now();
        let mut created = Vec::with_capacity(attachments.len());
        for attachment in attachments {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            let row = attachment.into_attachment(id, now);
            stored.insert(id, row.clone());
            created.push(row);
        }
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Attachment>, DomainError> {
        Ok(self.attachments.read().await.get(&id).cloned())
    }

    async fn list_by_application(&self, application_id: i64) -> Result<Vec<Attachment>, DomainError> {
        let attachments = self.attachments.read().await;
        Ok(attachments
            .values()
            .rev()
            .filter(|a| a.application_id == application_id)
            .cloned()
            .collect())
    }

    async fn usage_for_application(&self, application_id: i64) -> Result<AttachmentUsage, DomainError> {
        let attachments = self.attachments.read().await;
        let mut usage = AttachmentUsage::default();
        for attachment in attachments.values().filter(|a| a.application_id == application_id) {
            usage.file_count += 1;
            usage.total_bytes += attachment.size_bytes.max(0) as u64;
        }
        Ok(usage)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        Ok(self.attachments.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::attachment::{DocumentType, UploadedBy};

    fn new_attachment(application_id: i64, size_bytes: i64) -> NewAttachment {
        NewAttachment {
            application_id,
            file_url: format!("{}/x_cv.pdf", application_id),
            file_name: "cv.pdf".to_string(),
            file_type: "application/pdf".to_string(),
            document_type: DocumentType::Cv,
            uploaded_by: UploadedBy::Candidate,
            size_bytes,
        }
    }

    #[tokio::test]
    async fn test_usage_sums_only_the_application() {
        let repo = MockAttachmentRepository::new();
        repo.create_many(vec![new_attachment(1, 100), new_attachment(1, 50), new_attachment(2, 999)])
            .await
            .unwrap();

        let usage = repo.usage_for_application(1).await.unwrap();
        assert_eq!(usage.file_count, 2);
        assert_eq!(usage.total_bytes, 150);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let repo = MockAttachmentRepository::new();
        let created = repo
            .create_many(vec![new_attachment(1, 1), new_attachment(1, 2)])
            .await
            .unwrap();

        let listed = repo.list_by_application(1).await.unwrap();
        assert_eq!(listed[0].id, created[1].id);
        assert_eq!(listed[1].id, created[0].id);
    }
}
