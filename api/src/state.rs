//! Shared handler state

use std::sync::Arc;

use ap_core::services::{
    LinkDispatchService, MagicLinkService, PasswordResetService, RateLimitService, UploadService,
};
use ap_infra::database::DatabasePool;
use ap_shared::config::RouteLimits;
use ap_shared::CorsConfig;

/// Settings of the HTTP surface itself
#[derive(Debug, Clone, Default)]
pub struct HttpSettings {
    /// Bearer key of the internal endpoints; empty disables them
    pub internal_api_key: String,
    /// Peers whose forwarding headers are believed
    pub trusted_proxies: Vec<String>,
    pub cors: CorsConfig,
    /// Send `Strict-Transport-Security`
    pub hsts: bool,
    pub route_limits: RouteLimits,
}

/// Services available to every handler
pub struct AppState {
    pub magic_links: Arc<MagicLinkService>,
    pub dispatch: Arc<LinkDispatchService>,
    pub password_resets: Arc<PasswordResetService>,
    pub uploads: Arc<UploadService>,
    pub rate_limits: Arc<RateLimitService>,
    /// Absent in tests
    pub database: Option<DatabasePool>,
    pub http: HttpSettings,
}

impl AppState {
    /// Scope every portal link must carry
    pub fn portal_scope(&self) -> &str {
        &self.magic_links.config().scope
    }
}
