//! Document storage backends
//!
//! - `local`: files below a root directory
//! - `supabase`: objects in a Supabase storage bucket

pub mod local;
pub mod supabase;

use std::sync::Arc;

use ap_core::services::FileStorageTrait;
use ap_shared::{StorageConfig, StorageMode};
use tracing::{info, warn};

use crate::InfrastructureError;

pub use local::LocalFileStorage;
pub use supabase::SupabaseStorage;

/// Build the configured storage backend
///
/// Returns `Ok(None)` when the selected backend lacks its settings; uploads
/// are then refused while the rest of the portal keeps working.
pub fn create_storage(config: &StorageConfig) -> Result<Option<Arc<dyn FileStorageTrait>>, InfrastructureError> {
    if !config.is_configured() {
        warn!(mode = ?config.mode, "Document storage is not configured, uploads are disabled");
        return Ok(None);
    }

    let storage: Arc<dyn FileStorageTrait> = match config.mode {
        StorageMode::Local => Arc::new(LocalFileStorage::new(&config.local_root)),
        StorageMode::Supabase => Arc::new(SupabaseStorage::new(
            &config.supabase_url,
            &config.supabase_service_role_key,
            &config.bucket,
        )?),
    };

    info!(backend = storage.backend_name(), "Document storage initialized");
    Ok(Some(storage))
}
