//! Delivery sink that records links in the application log
//!
//! Used where no mail transport is wired in. The token part of every link is
//! masked before it reaches the log.

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use ap_core::services::{LinkDeliveryTrait, MagicLinkMessage, PasswordResetMessage};
use ap_shared::url::mask_token_url;

#[derive(Debug, Default, Clone, Copy)]
pub struct LogLinkDelivery;

impl LogLinkDelivery {
    pub fn new() -> Self {
        Self
    }

    fn message_id() -> String {
        format!("log-{}", Uuid::new_v4().simple())
    }
}

/// Keep the domain, hide the mailbox
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl LinkDeliveryTrait for LogLinkDelivery {
    async fn deliver_magic_link(&self, message: &MagicLinkMessage) -> Result<String, String> {
        let message_id = Self::message_id();
        info!(
            %message_id,
            recipient = %mask_email(&message.recipient),
            reference = %message.reference,
            url = %mask_token_url(&message.url),
            expires_at = %message.expires_at,
            "Upload link ready for delivery"
        );
        Ok(message_id)
    }

    async fn deliver_password_reset(&self, message: &PasswordResetMessage) -> Result<String, String> {
        let message_id = Self::message_id();
        info!(
            %message_id,
            recipient = %mask_email(&message.recipient),
            url = %mask_token_url(&message.url),
            expires_at = %message.expires_at,
            "Password reset link ready for delivery"
        );
        Ok(message_id)
    }
}
