//! File storage configuration

use serde::{Deserialize, Serialize};

/// Where uploaded documents are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// Files on the local filesystem
    Local,
    /// Supabase storage bucket
    Supabase,
}

impl std::str::FromStr for StorageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(StorageMode::Local),
            "supabase" => Ok(StorageMode::Supabase),
            _ => Err(format!("Invalid storage mode: {}", s)),
        }
    }
}

/// Storage backend settings
#[derive(Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Selected backend
    pub mode: StorageMode,

    /// Root directory for local storage
    pub local_root: String,

    /// Supabase project URL
    pub supabase_url: String,

    /// Supabase service role key
    pub supabase_service_role_key: String,

    /// Bucket for applicant documents
    pub bucket: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            mode: StorageMode::Local,
            local_root: String::from("uploads"),
            supabase_url: String::new(),
            supabase_service_role_key: String::new(),
            bucket: String::from("applicant-documents"),
        }
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("mode", &self.mode)
            .field("local_root", &self.local_root)
            .field("supabase_url", &self.supabase_url)
            .field("supabase_service_role_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .finish()
    }
}

impl StorageConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();
        let mode = match std::env::var("STORAGE_MODE") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.mode,
        };

        Ok(Self {
            mode,
            local_root: std::env::var("UPLOAD_FOLDER").unwrap_or(defaults.local_root),
            supabase_url: std::env::var("SUPABASE_URL").unwrap_or_default(),
            supabase_service_role_key: std::env::var("SUPABASE_SERVICE_ROLE_KEY").unwrap_or_default(),
            bucket: std::env::var("SUPABASE_STORAGE_BUCKET").unwrap_or(defaults.bucket),
        })
    }

    /// Whether the selected backend has everything it needs
    pub fn is_configured(&self) -> bool {
        match self.mode {
            StorageMode::Local => !self.local_root.trim().is_empty(),
            StorageMode::Supabase => {
                !self.supabase_url.trim().is_empty()
                    && !self.supabase_service_role_key.trim().is_empty()
                    && !self.bucket.trim().is_empty()
            }
        }
    }
}
