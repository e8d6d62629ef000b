//! Periodic removal of link rows that can never be redeemed again
//!
//! Magic links go once expired or revoked, password reset tokens once
//! expired or used.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::repositories::{MagicLinkRepository, PasswordResetRepository};

use super::config::TokenCleanupConfig;

pub struct TokenCleanupService {
    magic_links: Arc<dyn MagicLinkRepository>,
    password_resets: Arc<dyn PasswordResetRepository>,
    config: TokenCleanupConfig,
}

impl TokenCleanupService {
    pub fn new(
        magic_links: Arc<dyn MagicLinkRepository>,
        password_resets: Arc<dyn PasswordResetRepository>,
        config: TokenCleanupConfig,
    ) -> Self {
        Self {
            magic_links,
            password_resets,
            config,
        }
    }

    /// One sweep over both tables
    ///
    /// A failing table is reported in [`CleanupResult::errors`] and does not
    /// keep the other one from being cleaned.
    pub async fn run_cleanup(&self) -> CleanupResult {
        let mut result = CleanupResult::default();
        if !self.config.enabled {
            return result;
        }

        let now = Utc::now();

        match self.magic_links.delete_stale(now).await {
            Ok(count) => result.magic_links_deleted = count,
            Err(e) => {
                error!(error = %e, "Magic link cleanup failed");
                result.errors.push(format!("magic links: {}", e));
            }
        }

        match self.password_resets.delete_stale(now).await {
            Ok(count) => result.password_resets_deleted = count,
            Err(e) => {
                error!(error = %e, "Password reset cleanup failed");
                result.errors.push(format!("password resets: {}", e));
            }
        }

        info!(
            magic_links = result.magic_links_deleted,
            password_resets = result.password_resets_deleted,
            "Token cleanup cycle finished"
        );
        result
    }

    /// Sweep every `interval_seconds` on a spawned tokio task
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            warn!("Token cleanup disabled");
            return;
        }

        let period = Duration::from_secs(self.config.interval_seconds.max(1));
        tokio::spawn(async move {
            info!(interval_seconds = period.as_secs(), "Token cleanup task started");
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let result = self.run_cleanup().await;
                if !result.is_success() {
                    warn!(errors = ?result.errors, "Token cleanup cycle had errors");
                }
            }
        });
    }
}

#[derive(Debug, Default)]
pub struct CleanupResult {
    pub magic_links_deleted: usize,
    pub password_resets_deleted: usize,
    /// One entry per table that could not be cleaned
    pub errors: Vec<String>,
}

impl CleanupResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn total_cleaned(&self) -> usize {
        self.magic_links_deleted + self.password_resets_deleted
    }
}
