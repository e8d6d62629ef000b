//! Incremental quota accounting for a streaming upload request.

use ap_shared::UploadConfig;

use crate::domain::entities::attachment::AttachmentUsage;
use crate::errors::QuotaError;

/// Budget of one file being received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBudget {
    mime_type: String,
    limit: Option<u64>,
    received: u64,
}

impl FileBudget {
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Bytes accepted so far
    pub fn received(&self) -> u64 {
        self.received
    }
}

/// Quota state of one upload request
///
/// Created with the application's stored usage; every file is opened with
/// `begin_file` and every chunk passes through `consume` before it is kept.
#[derive(Debug, Clone)]
pub struct UploadSession {
    config: UploadConfig,
    application_id: i64,
    existing: AttachmentUsage,
    files: u32,
    bytes: u64,
}

impl UploadSession {
    pub fn new(config: UploadConfig, application_id: i64, existing: AttachmentUsage) -> Self {
        Self {
            config,
            application_id,
            existing,
            files: 0,
            bytes: 0,
        }
    }

    pub fn application_id(&self) -> i64 {
        self.application_id
    }

    /// Files opened in this request
    pub fn file_count(&self) -> u32 {
        self.files
    }

    /// Bytes accepted in this request
    pub fn total_bytes(&self) -> u64 {
        self.bytes
    }

    /// Open the next file of the request
    pub fn begin_file(&mut self, mime_type: &str) -> Result<FileBudget, QuotaError> {
        if !self.config.is_allowed(mime_type) {
            return Err(QuotaError::InvalidFileType {
                mime: mime_type.to_string(),
            });
        }

        let max = self.config.max_files_per_request;
        if max > 0 && self.files + 1 > max {
            return Err(QuotaError::TooManyFiles { max });
        }

        let max = self.config.max_files_per_application;
        if max > 0 && self.existing.file_count + self.files + 1 > max {
            return Err(QuotaError::TooManyFilesForApplication { max });
        }

        self.files += 1;
        Ok(FileBudget {
            mime_type: mime_type.to_string(),
            limit: self.config.max_file_bytes(mime_type),
            received: 0,
        })
    }

    /// Account `len` more bytes of `file`
    ///
    /// Checked in order: the file's own limit, the request, the application.
    pub fn consume(&mut self, file: &mut FileBudget, len: u64) -> Result<(), QuotaError> {
        let file_total = file.received.saturating_add(len);
        if let Some(max_bytes) = file.limit {
            if file_total > max_bytes {
                return Err(QuotaError::FileTooLarge { max_bytes });
            }
        }

        let request_total = self.bytes.saturating_add(len);
        if let Some(max_bytes) = self.config.request_limit() {
            if request_total > max_bytes {
                return Err(QuotaError::RequestTooLarge { max_bytes });
            }
        }

        if let Some(max_bytes) = self.config.application_limit() {
            if self.existing.total_bytes.saturating_add(request_total) > max_bytes {
                return Err(QuotaError::ApplicationQuotaExceeded { max_bytes });
            }
        }

        file.received = file_total;
        self.bytes = request_total;
        Ok(())
    }

    /// Fail an empty request
    pub fn finish(&self) -> Result<(), QuotaError> {
        if self.files == 0 {
            return Err(QuotaError::NoFiles);
        }
        Ok(())
    }
}
