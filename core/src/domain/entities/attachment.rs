//! Attachment entity for documents stored against an application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of document a candidate declares for an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Cv,
    CoverLetter,
    Certificate,
    Other,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cv => "cv",
            Self::CoverLetter => "cover_letter",
            Self::Certificate => "certificate",
            Self::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "cv" => Some(Self::Cv),
            "cover_letter" => Some(Self::CoverLetter),
            "certificate" => Some(Self::Certificate),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Lenient parse used for form input: unknown or empty values become `Other`
    pub fn from_form(value: Option<&str>) -> Self {
        value
            .map(str::trim)
            .and_then(Self::from_str)
            .unwrap_or(Self::Other)
    }
}

/// Who put the file on the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadedBy {
    Candidate,
    Recruiter,
}

impl UploadedBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Candidate => "candidate",
            Self::Recruiter => "recruiter",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "candidate" => Some(Self::Candidate),
            "recruiter" => Some(Self::Recruiter),
            _ => None,
        }
    }
}

/// A stored document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub application_id: i64,

    /// Storage location (local path or object key)
    #[serde(skip_serializing)]
    pub file_url: String,

    /// Sanitised original filename
    pub file_name: String,

    /// MIME type accepted at upload
    pub file_type: String,

    pub document_type: DocumentType,
    pub uploaded_by: UploadedBy,

    /// Stored size in bytes
    pub size_bytes: i64,

    pub created_at: DateTime<Utc>,
}

impl Attachment {
    /// Candidates may only remove what they uploaded themselves
    pub fn is_deletable_by_candidate(&self) -> bool {
        self.uploaded_by == UploadedBy::Candidate
    }
}

/// Attachment row to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttachment {
    pub application_id: i64,
    pub file_url: String,
    pub file_name: String,
    pub file_type: String,
    pub document_type: DocumentType,
    pub uploaded_by: UploadedBy,
    pub size_bytes: i64,
}

impl NewAttachment {
    /// Materialise the row once the store assigned an id
    pub fn into_attachment(self, id: i64, created_at: DateTime<Utc>) -> Attachment {
        Attachment {
            id,
            application_id: self.application_id,
            file_url: self.file_url,
            file_name: self.file_name,
            file_type: self.file_type,
            document_type: self.document_type,
            uploaded_by: self.uploaded_by,
            size_bytes: self.size_bytes,
            created_at,
        }
    }
}

/// Stored file count and byte total for one application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentUsage {
    pub file_count: u32,
    pub total_bytes: u64,
}
