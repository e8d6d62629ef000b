//! Recording delivery channel for tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::traits::{LinkDeliveryTrait, MagicLinkMessage, PasswordResetMessage};

#[derive(Default)]
pub struct MockLinkDelivery {
    magic_links: Arc<RwLock<Vec<MagicLinkMessage>>>,
    password_resets: Arc<RwLock<Vec<PasswordResetMessage>>>,
    should_fail: AtomicBool,
}

impl MockLinkDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub async fn magic_links(&self) -> Vec<MagicLinkMessage> {
        self.magic_links.read().await.clone()
    }

    pub async fn password_resets(&self) -> Vec<PasswordResetMessage> {
        self.password_resets.read().await.clone()
    }

    /// Raw token of the most recent upload link
    pub async fn last_magic_link_token(&self) -> Option<String> {
        let links = self.magic_links.read().await;
        links.last().and_then(|m| last_segment(&m.url))
    }

    /// Raw token of the most recent reset link
    pub async fn last_password_reset_token(&self) -> Option<String> {
        let resets = self.password_resets.read().await;
        resets.last().and_then(|m| last_segment(&m.url))
    }
}

fn last_segment(url: &str) -> Option<String> {
    url.rsplit('/').next().filter(|s| !s.is_empty()).map(str::to_string)
}

#[async_trait]
impl LinkDeliveryTrait for MockLinkDelivery {
    async fn deliver_magic_link(&self, message: &MagicLinkMessage) -> Result<String, String> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err("mail transport unavailable".to_string());
        }
        let mut links = self.magic_links.write().await;
        links.push(message.clone());
        Ok(format!("mock-{}", links.len()))
    }

    async fn deliver_password_reset(&self, message: &PasswordResetMessage) -> Result<String, String> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err("mail transport unavailable".to_string());
        }
        let mut resets = self.password_resets.write().await;
        resets.push(message.clone());
        Ok(format!("mock-{}", resets.len()))
    }
}
