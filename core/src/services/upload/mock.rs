//! In-memory storage sink for tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::storage::FileStorageTrait;

pub struct MockFileStorage {
    objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    /// Saves allowed before every further save fails
    fail_after: AtomicUsize,
}

impl MockFileStorage {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(RwLock::new(HashMap::new())),
            fail_after: AtomicUsize::new(usize::MAX),
        }
    }

    /// Let the next `saves` writes succeed and fail the rest
    pub fn fail_after(&self, saves: usize) {
        self.fail_after.store(saves, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn contains(&self, file_url: &str) -> bool {
        self.objects.read().await.contains_key(file_url)
    }
}

impl Default for MockFileStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileStorageTrait for MockFileStorage {
    async fn save(&self, object_name: &str, _content_type: &str, data: Vec<u8>) -> Result<String, String> {
        let remaining = self.fail_after.load(Ordering::SeqCst);
        if remaining == 0 {
            return Err("storage unavailable".to_string());
        }
        if remaining != usize::MAX {
            self.fail_after.store(remaining - 1, Ordering::SeqCst);
        }
        self.objects.write().await.insert(object_name.to_string(), data);
        Ok(object_name.to_string())
    }

    async fn delete(&self, file_url: &str) -> Result<(), String> {
        self.objects.write().await.remove(file_url);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
