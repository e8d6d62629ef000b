//! Internal user account (recruiters and admins) whose password can be reset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of an internal user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Recruiter,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Recruiter => "recruiter",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "recruiter" => Some(Self::Recruiter),
            _ => None,
        }
    }
}

/// User entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Login e-mail, stored lowercase
    pub email: String,

    /// bcrypt hash of the current password
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub role: UserRole,

    /// Inactive accounts cannot request resets
    pub is_active: bool,

    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Normalise an e-mail address for lookups
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Whether a reset may be issued for this account
    pub fn can_reset_password(&self) -> bool {
        self.is_active
    }
}
