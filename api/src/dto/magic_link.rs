use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body of `POST /api/magic-links`
///
/// Without `email` the link goes to the candidate's address on file.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMagicLinkRequest {
    #[validate(range(min = 1))]
    pub application_id: Option<i64>,

    #[validate(email, length(max = 254))]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MagicLinkSentResponse {
    pub status: String,
    pub application_id: i64,
    pub expires_at: DateTime<Utc>,
}

impl MagicLinkSentResponse {
    pub fn new(application_id: i64, expires_at: DateTime<Utc>) -> Self {
        Self {
            status: "sent".to_string(),
            application_id,
            expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokeResponse {
    pub status: String,
    /// Links that were live before the call
    pub revoked: usize,
}

impl RevokeResponse {
    pub fn new(revoked: usize) -> Self {
        Self {
            status: if revoked > 0 { "revoked" } else { "unchanged" }.to_string(),
            revoked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation() {
        let valid = CreateMagicLinkRequest {
            application_id: Some(7),
            email: Some("candidate@example.com".to_string()),
        };
        assert!(valid.validate().is_ok());

        let without_email = CreateMagicLinkRequest {
            application_id: Some(7),
            email: None,
        };
        assert!(without_email.validate().is_ok());

        let bad_email = CreateMagicLinkRequest {
            application_id: Some(7),
            email: Some("not-an-address".to_string()),
        };
        assert!(bad_email.validate().is_err());

        let bad_id = CreateMagicLinkRequest {
            application_id: Some(0),
            email: None,
        };
        assert!(bad_id.validate().is_err());
    }

    #[test]
    fn test_revoke_status() {
        assert_eq!(RevokeResponse::new(2).status, "revoked");
        assert_eq!(RevokeResponse::new(0).status, "unchanged");
    }
}
