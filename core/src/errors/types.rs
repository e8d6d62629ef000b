//! Categorical error types for the token, quota and validation rules
//!
//! Token and quota errors are deliberately coarse: the presentation layer
//! decides how much of the category a caller gets to see.

use thiserror::Error;

/// Token presentation failures shared by magic links and password resets
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token not found")]
    NotFound,

    #[error("Token expired")]
    Expired,

    #[error("Token revoked")]
    Revoked,

    #[error("Too many failed attempts")]
    TooManyAttempts,

    #[error("Token already used")]
    AlreadyUsed,

    #[error("Token generation failed")]
    GenerationFailed,
}

impl TokenError {
    /// Short reason recorded in audit rows and logs
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Expired => "expired",
            Self::Revoked => "revoked",
            Self::TooManyAttempts => "locked",
            Self::AlreadyUsed => "used",
            Self::GenerationFailed => "generation_failed",
        }
    }
}

/// Upload budget violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuotaError {
    #[error("No files provided")]
    NoFiles,

    #[error("File type not allowed: {mime}")]
    InvalidFileType { mime: String },

    #[error("File content does not match declared type {mime}")]
    ContentMismatch { mime: String },

    #[error("File exceeds {max_bytes} bytes")]
    FileTooLarge { max_bytes: u64 },

    #[error("Request exceeds {max_bytes} bytes")]
    RequestTooLarge { max_bytes: u64 },

    #[error("Application storage quota of {max_bytes} bytes exceeded")]
    ApplicationQuotaExceeded { max_bytes: u64 },

    #[error("Too many files in one request (max {max})")]
    TooManyFiles { max: u32 },

    #[error("Too many files for this application (max {max})")]
    TooManyFilesForApplication { max: u32 },
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("{message}")]
    PasswordPolicy { message: String },

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Invalid file name")]
    InvalidFileName,
}
