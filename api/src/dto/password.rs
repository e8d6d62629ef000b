use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body of `POST /forgot-password`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,
}

/// Request body of `POST /reset-password/{token}`
///
/// The password policy itself is enforced by the reset service.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, max = 128))]
    pub password: String,

    #[serde(alias = "confirm_password")]
    #[validate(length(min = 1, max = 128))]
    pub password_confirm: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetLinkResponse {
    pub status: String,
    pub expires_at: DateTime<Utc>,
}
