//! Portal status, storing uploads and deleting candidate documents.

use std::sync::Arc;

use ap_shared::filename::{object_name, secure_filename};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::entities::application::{Application, Candidate};
use crate::domain::entities::attachment::{Attachment, DocumentType, NewAttachment, UploadedBy};
use crate::domain::entities::magic_link::MagicLinkToken;
use crate::domain::value_objects::RequestContext;
use crate::errors::{DomainError, DomainResult, QuotaError, TokenError, ValidationError};
use crate::repositories::{ApplicationRepository, AttachmentRepository};
use crate::services::audit::AuditService;
use crate::services::quota::{IncomingFile, QuotaService};

use super::sniff::content_matches;
use super::storage::FileStorageTrait;

/// A fully received file of an upload request
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Name as sent by the client
    pub file_name: String,
    pub mime_type: String,
    pub document_type: DocumentType,
    pub data: Vec<u8>,
}

/// Stored usage of an application against its limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaUsage {
    pub used_bytes: u64,
    /// `None` when unlimited
    pub max_bytes: Option<u64>,
    pub file_count: u32,
    pub max_files: u32,
}

/// What the upload portal shows for a valid link
#[derive(Debug, Clone)]
pub struct PortalStatus {
    pub application: Application,
    pub candidate: Option<Candidate>,
    /// Newest first
    pub attachments: Vec<Attachment>,
    pub quota: QuotaUsage,
    pub hours_remaining: i64,
}

pub struct UploadService {
    attachments: Arc<dyn AttachmentRepository>,
    applications: Arc<dyn ApplicationRepository>,
    quota: Arc<QuotaService>,
    storage: Option<Arc<dyn FileStorageTrait>>,
    audit: Arc<AuditService>,
}

impl UploadService {
    pub fn new(
        attachments: Arc<dyn AttachmentRepository>,
        applications: Arc<dyn ApplicationRepository>,
        quota: Arc<QuotaService>,
        storage: Option<Arc<dyn FileStorageTrait>>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self {
            attachments,
            applications,
            quota,
            storage,
            audit,
        }
    }

    pub fn quota(&self) -> &QuotaService {
        &self.quota
    }

    /// Fail fast before reading a body when no storage sink is configured
    pub fn ensure_storage(&self) -> DomainResult<&Arc<dyn FileStorageTrait>> {
        self.storage.as_ref().ok_or(DomainError::StorageNotConfigured)
    }

    /// Portal view of the application behind a validated link
    pub async fn status(&self, record: &MagicLinkToken) -> DomainResult<PortalStatus> {
        let application = self
            .applications
            .find_application(record.application_id)
            .await?
            .ok_or(TokenError::NotFound)?;
        let candidate = self.applications.find_candidate(application.candidate_id).await?;
        let attachments = self.attachments.list_by_application(application.id).await?;
        let usage = self.attachments.usage_for_application(application.id).await?;

        let config = self.quota.config();
        Ok(PortalStatus {
            application,
            candidate,
            attachments,
            quota: QuotaUsage {
                used_bytes: usage.total_bytes,
                max_bytes: config.application_limit(),
                file_count: usage.file_count,
                max_files: config.max_files_per_application,
            },
            hours_remaining: record.hours_remaining_at(Utc::now()),
        })
    }

    /// Attachments of an application, newest first
    pub async fn list_attachments(&self, application_id: i64) -> DomainResult<Vec<Attachment>> {
        self.attachments.list_by_application(application_id).await
    }

    /// Store a batch of received files for an application
    ///
    /// All or nothing: when a storage write or the row insert fails, every
    /// object already written for this request is deleted again.
    pub async fn store_files(
        &self,
        application_id: i64,
        files: Vec<UploadedFile>,
        ctx: &RequestContext,
    ) -> DomainResult<Vec<Attachment>> {
        let file_count = files.len();
        let total_bytes: u64 = files.iter().map(|f| f.data.len() as u64).sum();

        match self.store_batch(application_id, files).await {
            Ok(stored) => {
                info!(application_id, files = stored.len(), bytes = total_bytes, "Upload stored");
                self.audit
                    .log_upload(application_id, stored.len(), total_bytes, None, ctx)
                    .await;
                Ok(stored)
            }
            Err(e) => {
                warn!(application_id, files = file_count, error = %e, "Upload rejected");
                self.audit
                    .log_upload(application_id, file_count, total_bytes, Some(&upload_failure_reason(&e)), ctx)
                    .await;
                Err(e)
            }
        }
    }

    /// Record a rejection that happened before `store_files`, e.g. while streaming
    pub async fn record_rejection(&self, application_id: i64, error: &DomainError, ctx: &RequestContext) {
        self.audit
            .log_upload(application_id, 0, 0, Some(&upload_failure_reason(error)), ctx)
            .await;
    }

    /// Delete a candidate's own upload and return the remaining attachments
    pub async fn delete_attachment(
        &self,
        application_id: i64,
        attachment_id: i64,
        ctx: &RequestContext,
    ) -> DomainResult<Vec<Attachment>> {
        let attachment = self
            .attachments
            .find_by_id(attachment_id)
            .await?
            .filter(|a| a.application_id == application_id)
            .ok_or_else(|| DomainError::NotFound {
                resource: "attachment".to_string(),
            })?;

        if !attachment.is_deletable_by_candidate() {
            return Err(DomainError::Forbidden {
                message: "only candidate uploads can be deleted".to_string(),
            });
        }

        self.attachments.delete(attachment.id).await?;

        // The row is gone; a leftover object is only logged
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.delete(&attachment.file_url).await {
                warn!(attachment_id, backend = storage.backend_name(), error = %e, "Failed to delete stored file");
            }
        }

        info!(application_id, attachment_id, "Attachment deleted");
        self.audit.log_attachment_deleted(application_id, attachment_id, ctx).await;

        self.attachments.list_by_application(application_id).await
    }

    async fn store_batch(&self, application_id: i64, files: Vec<UploadedFile>) -> DomainResult<Vec<Attachment>> {
        let storage = self.ensure_storage()?;

        let incoming: Vec<IncomingFile> = files
            .iter()
            .map(|f| IncomingFile::new(f.mime_type.clone(), f.data.len() as u64))
            .collect();
        self.quota.check_quota(application_id, &incoming).await?;

        let mut prepared = Vec::with_capacity(files.len());
        for file in files {
            let file_name = secure_filename(&file.file_name).ok_or(ValidationError::InvalidFileName)?;
            if !content_matches(&file.mime_type, &file.data) {
                return Err(QuotaError::ContentMismatch { mime: file.mime_type }.into());
            }
            prepared.push((file_name, file));
        }

        let mut saved: Vec<String> = Vec::with_capacity(prepared.len());
        let mut rows = Vec::with_capacity(prepared.len());
        for (file_name, file) in prepared {
            let unique = Uuid::new_v4().simple().to_string();
            let name = object_name(application_id, &unique, &file_name);
            let size_bytes = file.data.len() as i64;

            match storage.save(&name, &file.mime_type, file.data).await {
                Ok(file_url) => {
                    saved.push(file_url.clone());
                    rows.push(NewAttachment {
                        application_id,
                        file_url,
                        file_name,
                        file_type: file.mime_type,
                        document_type: file.document_type,
                        uploaded_by: UploadedBy::Candidate,
                        size_bytes,
                    });
                }
                Err(e) => {
                    error!(application_id, backend = storage.backend_name(), error = %e, "Storage write failed");
                    self.rollback(storage.as_ref(), &saved).await;
                    return Err(DomainError::Storage { message: e });
                }
            }
        }

        match self.attachments.create_many(rows).await {
            Ok(stored) => Ok(stored),
            Err(e) => {
                self.rollback(storage.as_ref(), &saved).await;
                Err(e)
            }
        }
    }

    async fn rollback(&self, storage: &dyn FileStorageTrait, saved: &[String]) {
        for file_url in saved {
            if let Err(e) = storage.delete(file_url).await {
                warn!(file_url = %file_url, error = %e, "Rollback could not delete stored file");
            }
        }
    }
}

/// Short reason stored with rejected uploads
fn upload_failure_reason(error: &DomainError) -> String {
    match error {
        DomainError::Quota(QuotaError::NoFiles) => "no_files",
        DomainError::Quota(QuotaError::InvalidFileType { .. }) => "invalid_file_type",
        DomainError::Quota(QuotaError::ContentMismatch { .. }) => "content_mismatch",
        DomainError::Quota(QuotaError::FileTooLarge { .. }) => "file_too_large",
        DomainError::Quota(QuotaError::RequestTooLarge { .. }) => "request_too_large",
        DomainError::Quota(QuotaError::ApplicationQuotaExceeded { .. }) => "quota_exceeded",
        DomainError::Quota(QuotaError::TooManyFiles { .. }) => "too_many_files",
        DomainError::Quota(QuotaError::TooManyFilesForApplication { .. }) => "too_many_files_for_application",
        DomainError::ValidationErr(_) => "invalid_file",
        DomainError::StorageNotConfigured => "storage_not_configured",
        DomainError::Storage { .. } => "storage_error",
        _ => "internal_error",
    }
    .to_string()
}
