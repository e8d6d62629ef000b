//! Shared error types and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Standard error response structure used across all API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Additional error details (field errors, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a detail field to the error response
    pub fn add_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let details = self.details.get_or_insert_with(HashMap::new);
        if let Ok(json_value) = serde_json::to_value(value) {
            details.insert(key.into(), json_value);
        }
        self
    }
}

/// Error codes returned by the public API
pub mod error_codes {
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const FORBIDDEN: &str = "forbidden";
    pub const NOT_FOUND: &str = "not_found";
    pub const BAD_REQUEST: &str = "bad_request";
    pub const INTERNAL_ERROR: &str = "internal_error";
    pub const VALIDATION_ERROR: &str = "validation_error";
    pub const RATE_LIMITED: &str = "rate_limited";
    pub const PASSWORD_MISMATCH: &str = "password_mismatch";
    pub const INVALID_OR_EXPIRED: &str = "invalid_or_expired";
    pub const TOKEN_INVALID: &str = "token_invalid";
    pub const TOKEN_EXPIRED: &str = "token_expired";
    pub const TOKEN_LOCKED: &str = "token_locked";
    pub const TOKEN_USED: &str = "token_used";
    pub const NO_FILES: &str = "no_files";
    pub const INVALID_FILE_TYPE: &str = "invalid_file_type";
    pub const CONTENT_MISMATCH: &str = "content_mismatch";
    pub const INVALID_FILE_NAME: &str = "invalid_file_name";
    pub const FILE_TOO_LARGE: &str = "file_too_large";
    pub const REQUEST_TOO_LARGE: &str = "request_too_large";
    pub const QUOTA_EXCEEDED: &str = "quota_exceeded";
    pub const TOO_MANY_FILES: &str = "too_many_files";
    pub const TOO_MANY_FILES_FOR_APPLICATION: &str = "too_many_files_for_application";
    pub const STORAGE_NOT_CONFIGURED: &str = "storage_not_configured";
    pub const UPLOAD_FAILED: &str = "upload_failed";
}
