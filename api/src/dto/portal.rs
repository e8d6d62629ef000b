//! Responses of the candidate upload portal

use ap_core::domain::entities::attachment::Attachment;
use ap_core::services::{PortalStatus, QuotaUsage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored file as the candidate sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentDto {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub file_type: String,
    pub document_type: String,
    pub uploaded_by: String,
    pub size_bytes: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&Attachment> for AttachmentDto {
    fn from(attachment: &Attachment) -> Self {
        Self {
            id: attachment.id,
            name: attachment.file_name.clone(),
            file_type: attachment.file_type.clone(),
            document_type: attachment.document_type.as_str().to_string(),
            uploaded_by: attachment.uploaded_by.as_str().to_string(),
            size_bytes: attachment.size_bytes,
            created_at: attachment.created_at,
        }
    }
}

pub fn attachment_list(attachments: &[Attachment]) -> Vec<AttachmentDto> {
    attachments.iter().map(AttachmentDto::from).collect()
}

/// `GET /r/{token}`
#[derive(Debug, Clone, Serialize)]
pub struct PortalStatusResponse {
    pub candidate_name: Option<String>,
    pub job_title: Option<String>,
    pub reference_number: String,
    pub uploaded_files: Vec<AttachmentDto>,
    pub quota: QuotaUsage,
    pub hours_remaining: i64,
    pub can_resend: bool,
}

impl From<PortalStatus> for PortalStatusResponse {
    fn from(status: PortalStatus) -> Self {
        Self {
            candidate_name: status.candidate.map(|c| c.name),
            job_title: status.application.job_title.clone(),
            reference_number: status.application.display_reference(),
            uploaded_files: attachment_list(&status.attachments),
            quota: status.quota,
            hours_remaining: status.hours_remaining,
            can_resend: true,
        }
    }
}

/// Rejected status view; an expired link may still be traded for a new one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalErrorResponse {
    pub error: String,
    pub message: String,
    pub can_resend: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedName {
    pub name: String,
}

/// `POST /r/{token}/upload`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    pub count: usize,
    pub uploaded_files: Vec<UploadedName>,
    pub all_uploaded_files: Vec<AttachmentDto>,
}

impl UploadResponse {
    pub fn new(stored: &[Attachment], all: &[Attachment]) -> Self {
        Self {
            status: "uploaded".to_string(),
            count: stored.len(),
            uploaded_files: stored
                .iter()
                .map(|a| UploadedName {
                    name: a.file_name.clone(),
                })
                .collect(),
            all_uploaded_files: attachment_list(all),
        }
    }
}

/// `DELETE /r/{token}/attachments/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAttachmentResponse {
    pub status: String,
    pub all_uploaded_files: Vec<AttachmentDto>,
}

impl DeleteAttachmentResponse {
    pub fn new(remaining: &[Attachment]) -> Self {
        Self {
            status: "deleted".to_string(),
            all_uploaded_files: attachment_list(remaining),
        }
    }
}
