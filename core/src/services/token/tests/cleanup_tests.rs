//! Tests for the token cleanup service

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::domain::entities::magic_link::MagicLinkToken;
use crate::domain::entities::password_reset::PasswordResetToken;
use crate::repositories::{MockMagicLinkRepository, MockPasswordResetRepository};
use crate::services::token::{TokenCleanupConfig, TokenCleanupService};

async fn seeded() -> (Arc<MockMagicLinkRepository>, Arc<MockPasswordResetRepository>) {
    let links = Arc::new(MockMagicLinkRepository::new());
    let resets = Arc::new(MockPasswordResetRepository::new());

    links.insert(MagicLinkToken::new(1, "live".to_string(), "upload_documents", 72)).await;
    let mut expired = MagicLinkToken::new(1, "expired".to_string(), "upload_documents", 72);
    expired.expires_at = Utc::now() - Duration::seconds(1);
    links.insert(expired).await;
    let mut revoked = MagicLinkToken::new(2, "revoked".to_string(), "upload_documents", 72);
    revoked.revoked_at = Some(Utc::now());
    links.insert(revoked).await;

    resets.insert(PasswordResetToken::new(1, "fresh".to_string(), 2)).await;
    let mut used = PasswordResetToken::new(1, "used".to_string(), 2);
    used.used_at = Some(Utc::now());
    resets.insert(used).await;

    (links, resets)
}

#[tokio::test]
async fn test_cleanup_removes_dead_rows() {
    let (links, resets) = seeded().await;
    let service = TokenCleanupService::new(links.clone(), resets.clone(), TokenCleanupConfig::default());

    let result = service.run_cleanup().await;

    assert!(result.is_success());
    assert_eq!(result.magic_links_deleted, 2);
    assert_eq!(result.password_resets_deleted, 1);
    assert_eq!(result.total_cleaned(), 3);
    assert_eq!(links.len().await, 1);
    assert_eq!(resets.tokens_for_user(1).await.len(), 1);

    // A second run has nothing left to do
    assert_eq!(service.run_cleanup().await.total_cleaned(), 0);
}

#[tokio::test]
async fn test_disabled_cleanup_is_a_no_op() {
    let (links, resets) = seeded().await;
    let config = TokenCleanupConfig {
        enabled: false,
        ..Default::default()
    };
    let service = TokenCleanupService::new(links.clone(), resets, config);

    let result = service.run_cleanup().await;

    assert_eq!(result.total_cleaned(), 0);
    assert_eq!(links.len().await, 3);
}

#[tokio::test(start_paused = true)]
async fn test_background_task_runs_on_interval() {
    let (links, resets) = seeded().await;
    let config = TokenCleanupConfig {
        interval_seconds: 60,
        enabled: true,
    };
    let service = Arc::new(TokenCleanupService::new(links.clone(), resets, config));

    service.start_background_task();
    // The first tick fires immediately
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    assert_eq!(links.len().await, 1);
}
