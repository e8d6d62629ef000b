//! Quota checks backed by the stored attachments of an application.

use std::sync::Arc;

use ap_shared::UploadConfig;
use tracing::debug;

use crate::errors::{DomainResult, QuotaError};
use crate::repositories::AttachmentRepository;

use super::session::UploadSession;

/// Declared type and size of a file about to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingFile {
    pub mime_type: String,
    pub size_bytes: u64,
}

impl IncomingFile {
    pub fn new(mime_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            mime_type: mime_type.into(),
            size_bytes,
        }
    }
}

pub struct QuotaService {
    attachments: Arc<dyn AttachmentRepository>,
    config: UploadConfig,
}

impl QuotaService {
    pub fn new(attachments: Arc<dyn AttachmentRepository>, config: UploadConfig) -> Self {
        Self { attachments, config }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Start accounting a streaming upload for an application
    pub async fn open_session(&self, application_id: i64) -> DomainResult<UploadSession> {
        let usage = self.attachments.usage_for_application(application_id).await?;
        debug!(
            application_id,
            stored_files = usage.file_count,
            stored_bytes = usage.total_bytes,
            "Upload session opened"
        );
        Ok(UploadSession::new(self.config.clone(), application_id, usage))
    }

    /// Judge a whole batch against every budget
    ///
    /// Nothing is reserved; a concurrent upload to the same application can
    /// still pass the same check.
    pub async fn check_quota(&self, application_id: i64, files: &[IncomingFile]) -> DomainResult<()> {
        if files.is_empty() {
            return Err(QuotaError::NoFiles.into());
        }

        let mut session = self.open_session(application_id).await?;
        for file in files {
            let mut budget = session.begin_file(&file.mime_type)?;
            session.consume(&mut budget, file.size_bytes)?;
        }
        session.finish()?;
        Ok(())
    }
}
