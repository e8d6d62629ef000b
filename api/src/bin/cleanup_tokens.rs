//! One-shot token cleanup, for cron or manual runs
//!
//! Deletes expired or revoked magic links and expired or used password reset
//! tokens, then exits. Exits non-zero when a table could not be cleaned.

use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::info;

use ap_api::telemetry;
use ap_core::services::{TokenCleanupConfig, TokenCleanupService};
use ap_infra::database::{DatabasePool, MySqlMagicLinkRepository, MySqlPasswordResetRepository};
use ap_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    telemetry::init_tracing(&config.logging);

    let database = DatabasePool::new(config.database.clone())
        .await
        .context("Failed to connect to the database")?;
    let pool = database.get_pool().clone();

    let service = TokenCleanupService::new(
        Arc::new(MySqlMagicLinkRepository::new(pool.clone())),
        Arc::new(MySqlPasswordResetRepository::new(pool)),
        TokenCleanupConfig {
            enabled: true,
            ..TokenCleanupConfig::from(&config.cleanup)
        },
    );

    let result = service.run_cleanup().await;
    database.close().await;

    info!(
        magic_links = result.magic_links_deleted,
        password_resets = result.password_resets_deleted,
        total = result.total_cleaned(),
        "Token cleanup finished"
    );

    if !result.is_success() {
        bail!("Token cleanup finished with errors: {}", result.errors.join("; "));
    }
    Ok(())
}
