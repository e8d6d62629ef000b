//! Local filesystem storage
//!
//! Objects are written below a root directory; the stored location is the
//! full path. Deletion refuses any path outside the root.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use ap_core::services::FileStorageTrait;

pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an object name below the root, rejecting traversal
    fn object_path(&self, object_name: &str) -> Result<PathBuf, String> {
        let relative = Path::new(object_name);
        let is_plain = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if object_name.is_empty() || !is_plain {
            return Err(format!("Invalid object name: {}", object_name));
        }
        Ok(self.root.join(relative))
    }

    /// Map a stored location back to a path, if it lies below the root
    fn stored_path(&self, file_url: &str) -> Option<PathBuf> {
        let path = Path::new(file_url);
        let relative = path.strip_prefix(&self.root).ok()?;
        let is_plain = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        (is_plain && relative.components().next().is_some()).then(|| path.to_path_buf())
    }
}

/// Write and flush `data`, removing the file at `path` if either step fails
async fn write_or_remove<W>(path: &Path, mut writer: W, data: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let result = async {
        writer.write_all(data).await?;
        writer.flush().await
    }
    .await;

    if result.is_err() {
        drop(writer);
        if let Err(e) = fs::remove_file(path).await {
            warn!(path = %path.display(), error = %e, "Failed to remove partial upload");
        }
    }
    result
}

#[async_trait]
impl FileStorageTrait for LocalFileStorage {
    async fn save(&self, object_name: &str, _content_type: &str, data: Vec<u8>) -> Result<String, String> {
        let path = self.object_path(object_name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| format!("Failed to create upload directory: {}", e))?;
        }

        // Object names are unique per upload, an existing file is never replaced
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| format!("Failed to create {}: {}", object_name, e))?;
        write_or_remove(&path, file, &data)
            .await
            .map_err(|e| format!("Failed to write {}: {}", object_name, e))?;

        debug!(object = object_name, bytes = data.len(), "Stored file locally");
        Ok(path.to_string_lossy().into_owned())
    }

    async fn delete(&self, file_url: &str) -> Result<(), String> {
        let path = self
            .stored_path(file_url)
            .ok_or_else(|| format!("Refusing to delete outside storage root: {}", file_url))?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(format!("Failed to delete {}: {}", file_url, e)),
        }
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}
