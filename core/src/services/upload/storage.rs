//! Storage sink for uploaded documents

use async_trait::async_trait;

/// Trait for document storage integration
#[async_trait]
pub trait FileStorageTrait: Send + Sync {
    /// Store a document under `object_name`, returning the location to persist
    async fn save(&self, object_name: &str, content_type: &str, data: Vec<u8>) -> Result<String, String>;
    /// Remove a stored document by the location returned from `save`
    async fn delete(&self, file_url: &str) -> Result<(), String>;
    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}
