//! Upload limits for documents sent through magic links

use serde::{Deserialize, Serialize};

use super::{env_list, env_or};

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_PNG: &str = "image/png";
pub const MIME_JPEG: &str = "image/jpeg";

/// Byte and file count budgets. A byte limit of 0 disables that limit.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    /// Total bytes accepted in one upload request
    pub max_request_bytes: u64,

    /// Largest single PDF
    pub max_pdf_bytes: u64,

    /// Largest single image
    pub max_image_bytes: u64,

    /// Total bytes stored per application
    pub max_application_bytes: u64,

    /// Files accepted in one request
    pub max_files_per_request: u32,

    /// Files stored per application
    pub max_files_per_application: u32,

    /// Accepted MIME types
    pub allowed_mime_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_request_bytes: 50 * 1024 * 1024,
            max_pdf_bytes: 10 * 1024 * 1024,
            max_image_bytes: 5 * 1024 * 1024,
            max_application_bytes: 150 * 1024 * 1024,
            max_files_per_request: 10,
            max_files_per_application: 50,
            allowed_mime_types: vec![
                MIME_PDF.to_string(),
                MIME_PNG.to_string(),
                MIME_JPEG.to_string(),
            ],
        }
    }
}

impl UploadConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let allowed = env_list("UPLOAD_ALLOWED_MIME_TYPES");

        Self {
            max_request_bytes: env_or("UPLOAD_MAX_BYTES_MAGIC_LINK", defaults.max_request_bytes),
            max_pdf_bytes: env_or("UPLOAD_MAX_FILE_BYTES_PDF", defaults.max_pdf_bytes),
            max_image_bytes: env_or("UPLOAD_MAX_FILE_BYTES_IMAGE", defaults.max_image_bytes),
            max_application_bytes: env_or(
                "UPLOAD_MAX_TOTAL_BYTES_PER_APPLICATION",
                defaults.max_application_bytes,
            ),
            max_files_per_request: env_or("UPLOAD_MAX_FILES_PER_REQUEST", defaults.max_files_per_request),
            max_files_per_application: env_or(
                "UPLOAD_MAX_FILES_PER_APPLICATION",
                defaults.max_files_per_application,
            ),
            allowed_mime_types: if allowed.is_empty() {
                defaults.allowed_mime_types
            } else {
                allowed
            },
        }
    }

    /// Whether a MIME type may be uploaded
    pub fn is_allowed(&self, mime: &str) -> bool {
        self.allowed_mime_types.iter().any(|allowed| allowed == mime)
    }

    /// Per-file byte limit for a MIME type, `None` when unlimited
    pub fn max_file_bytes(&self, mime: &str) -> Option<u64> {
        let limit = if mime == MIME_PDF {
            self.max_pdf_bytes
        } else if mime.starts_with("image/") {
            self.max_image_bytes
        } else {
            0
        };
        non_zero(limit)
    }

    /// Per-request byte limit, `None` when unlimited
    pub fn request_limit(&self) -> Option<u64> {
        non_zero(self.max_request_bytes)
    }

    /// Per-application byte limit, `None` when unlimited
    pub fn application_limit(&self) -> Option<u64> {
        non_zero(self.max_application_bytes)
    }
}

fn non_zero(limit: u64) -> Option<u64> {
    (limit > 0).then_some(limit)
}
