//! Request and response bodies

pub mod magic_link;
pub mod password;
pub mod portal;

use serde::{Deserialize, Serialize};

pub use magic_link::{CreateMagicLinkRequest, MagicLinkSentResponse, RevokeResponse};
pub use password::{ForgotPasswordRequest, ResetLinkResponse, ResetPasswordRequest};
pub use portal::{
    AttachmentDto, DeleteAttachmentResponse, PortalErrorResponse, PortalStatusResponse, UploadResponse,
};

/// Body of responses that only report an outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
        }
    }
}
