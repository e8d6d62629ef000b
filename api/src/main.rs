use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{info, warn};

use ap_api::{create_app, telemetry, AppState, HttpSettings};
use ap_core::repositories::{
    ApplicationRepository, AttachmentRepository, AuditLogRepository, MagicLinkRepository,
    PasswordResetRepository, UserRepository,
};
use ap_core::services::{
    AuditService, AuditServiceConfig, LinkDeliveryTrait, LinkDispatchService, MagicLinkService,
    PasswordResetService, QuotaService, RateLimitService, TokenCleanupService, TokenHasher, UploadService,
};
use ap_infra::database::{
    DatabasePool, MySqlApplicationRepository, MySqlAttachmentRepository, MySqlAuditLogRepository,
    MySqlMagicLinkRepository, MySqlPasswordResetRepository, MySqlUserRepository,
};
use ap_infra::services::{create_rate_limiter, LogLinkDelivery};
use ap_infra::storage::create_storage;
use ap_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    telemetry::init_tracing(&config.logging);
    config.validate().context("Invalid configuration")?;

    info!(environment = %config.environment, "Starting applicant portal API");

    let database = DatabasePool::new(config.database.clone())
        .await
        .context("Failed to connect to the database")?;
    database
        .run_migrations()
        .await
        .context("Failed to run database migrations")?;
    let pool = database.get_pool().clone();

    let magic_link_repo: Arc<dyn MagicLinkRepository> = Arc::new(MySqlMagicLinkRepository::new(pool.clone()));
    let password_reset_repo: Arc<dyn PasswordResetRepository> =
        Arc::new(MySqlPasswordResetRepository::new(pool.clone()));
    let user_repo: Arc<dyn UserRepository> = Arc::new(MySqlUserRepository::new(pool.clone()));
    let application_repo: Arc<dyn ApplicationRepository> = Arc::new(MySqlApplicationRepository::new(pool.clone()));
    let attachment_repo: Arc<dyn AttachmentRepository> = Arc::new(MySqlAttachmentRepository::new(pool.clone()));
    let audit_repo: Arc<dyn AuditLogRepository> = Arc::new(MySqlAuditLogRepository::new(pool));

    let audit = Arc::new(AuditService::new(audit_repo, AuditServiceConfig::default()));
    let delivery: Arc<dyn LinkDeliveryTrait> = Arc::new(LogLinkDelivery::new());
    let public_base_url = config.server.public_base_url.clone();

    let magic_links = Arc::new(MagicLinkService::new(
        magic_link_repo.clone(),
        TokenHasher::new(&config.magic_link.hmac_secret),
        audit.clone(),
        (&config.magic_link).into(),
    ));
    let dispatch = Arc::new(LinkDispatchService::new(
        magic_links.clone(),
        application_repo.clone(),
        delivery.clone(),
        audit.clone(),
        public_base_url.clone(),
    ));
    let password_resets = Arc::new(PasswordResetService::new(
        password_reset_repo.clone(),
        user_repo,
        delivery,
        audit.clone(),
        TokenHasher::new(&config.password_reset.hmac_secret),
        (&config.password_reset).into(),
        public_base_url,
    ));

    let storage = create_storage(&config.storage).context("Failed to set up document storage")?;
    match &storage {
        Some(backend) => info!(backend = backend.backend_name(), "Document storage ready"),
        None => warn!("No document storage configured, uploads are disabled"),
    }
    let quota = Arc::new(QuotaService::new(attachment_repo.clone(), config.upload.clone()));
    let uploads = Arc::new(UploadService::new(
        attachment_repo,
        application_repo,
        quota,
        storage,
        audit.clone(),
    ));

    let limiter = create_rate_limiter(&config.rate_limit)
        .await
        .context("Failed to set up rate limiting")?;
    let rate_limits = Arc::new(RateLimitService::new(limiter, audit, config.rate_limit.enabled));

    let cleanup = Arc::new(TokenCleanupService::new(
        magic_link_repo,
        password_reset_repo,
        (&config.cleanup).into(),
    ));
    cleanup.start_background_task();

    let state = web::Data::new(AppState {
        magic_links,
        dispatch,
        password_resets,
        uploads,
        rate_limits,
        database: Some(database.clone()),
        http: HttpSettings {
            internal_api_key: config.server.internal_api_key.clone(),
            trusted_proxies: config.server.trusted_proxies.clone(),
            cors: config.cors.clone(),
            hsts: config.environment.is_production(),
            route_limits: config.rate_limit.routes.clone(),
        },
    });

    let bind_address = config.server.bind_address();
    info!(address = %bind_address, workers = config.server.workers, "Server listening");

    HttpServer::new(move || create_app(state.clone()))
        .workers(config.server.workers.max(1))
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await
        .context("Server error")?;

    database.close().await;
    info!("Server stopped");
    Ok(())
}
