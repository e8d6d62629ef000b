//! Test wiring: the real services over in-memory repositories

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use ap_api::{AppState, HttpSettings};
use ap_core::domain::entities::magic_link::MagicLinkToken;
use ap_core::domain::value_objects::RequestContext;
use ap_core::repositories::{
    MockApplicationRepository, MockAttachmentRepository, MockAuditLogRepository, MockMagicLinkRepository,
    MockPasswordResetRepository, MockUserRepository,
};
use ap_core::services::{
    AuditService, AuditServiceConfig, FileStorageTrait, LinkDispatchService, MagicLinkService,
    MagicLinkServiceConfig, MockFileStorage, MockLinkDelivery, PasswordResetService, PasswordResetServiceConfig,
    QuotaService, RateLimitService, TokenHasher, UploadService,
};
use ap_infra::services::MemoryRateLimiter;
use ap_shared::config::RouteLimits;
use ap_shared::{CorsConfig, UploadConfig};

pub const API_KEY: &str = "internal-test-key";
pub const MAGIC_LINK_SECRET: &str = "test-magic-link-secret";
pub const RESET_SECRET: &str = "test-reset-secret";
pub const BOUNDARY: &str = "----portal-test-boundary";

pub const PDF: &[u8] = b"%PDF-1.7\n1 0 obj\n<<>>\nendobj\n";

pub struct TestConfig {
    pub upload: UploadConfig,
    pub route_limits: RouteLimits,
    pub rate_limiting: bool,
    pub storage: bool,
    pub max_failures: i32,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            upload: UploadConfig::default(),
            route_limits: RouteLimits::default(),
            rate_limiting: false,
            storage: true,
            max_failures: 10,
        }
    }
}

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub magic_link_repo: Arc<MockMagicLinkRepository>,
    pub password_reset_repo: Arc<MockPasswordResetRepository>,
    pub users: Arc<MockUserRepository>,
    pub applications: Arc<MockApplicationRepository>,
    pub attachments: Arc<MockAttachmentRepository>,
    pub audit_repo: Arc<MockAuditLogRepository>,
    pub delivery: Arc<MockLinkDelivery>,
    pub storage: Arc<MockFileStorage>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::build(TestConfig::default())
    }

    pub fn build(config: TestConfig) -> Self {
        let magic_link_repo = Arc::new(MockMagicLinkRepository::new());
        let password_reset_repo = Arc::new(MockPasswordResetRepository::new());
        let users = Arc::new(MockUserRepository::new());
        let applications = Arc::new(MockApplicationRepository::new());
        let attachments = Arc::new(MockAttachmentRepository::new());
        let audit_repo = Arc::new(MockAuditLogRepository::new());
        let delivery = Arc::new(MockLinkDelivery::new());
        let storage = Arc::new(MockFileStorage::new());

        let audit = Arc::new(AuditService::new(
            audit_repo.clone(),
            AuditServiceConfig { async_writes: false },
        ));

        let magic_links = Arc::new(MagicLinkService::new(
            magic_link_repo.clone(),
            TokenHasher::new(MAGIC_LINK_SECRET),
            audit.clone(),
            MagicLinkServiceConfig {
                max_failures: config.max_failures,
                ..Default::default()
            },
        ));
        let dispatch = Arc::new(LinkDispatchService::new(
            magic_links.clone(),
            applications.clone(),
            delivery.clone(),
            audit.clone(),
            Some("https://jobs.example.com".to_string()),
        ));
        let password_resets = Arc::new(PasswordResetService::new(
            password_reset_repo.clone(),
            users.clone(),
            delivery.clone(),
            audit.clone(),
            TokenHasher::new(RESET_SECRET),
            PasswordResetServiceConfig {
                bcrypt_cost: 4,
                ..Default::default()
            },
            Some("https://jobs.example.com".to_string()),
        ));

        let quota = Arc::new(QuotaService::new(attachments.clone(), config.upload));
        let file_storage: Option<Arc<dyn FileStorageTrait>> = if config.storage {
            Some(storage.clone())
        } else {
            None
        };
        let uploads = Arc::new(UploadService::new(
            attachments.clone(),
            applications.clone(),
            quota,
            file_storage,
            audit.clone(),
        ));

        let rate_limits = Arc::new(RateLimitService::new(
            Arc::new(MemoryRateLimiter::new()),
            audit,
            config.rate_limiting,
        ));

        let state = web::Data::new(AppState {
            magic_links,
            dispatch,
            password_resets,
            uploads,
            rate_limits,
            database: None,
            http: HttpSettings {
                internal_api_key: API_KEY.to_string(),
                trusted_proxies: vec![],
                cors: CorsConfig::development(),
                hsts: false,
                route_limits: config.route_limits,
            },
        });

        Self {
            state,
            magic_link_repo,
            password_reset_repo,
            users,
            applications,
            attachments,
            audit_repo,
            delivery,
            storage,
        }
    }

    /// Seed an application with a reachable candidate and issue a link for it
    pub async fn issue_link(&self, application_id: i64) -> (String, MagicLinkToken) {
        self.applications
            .seed(application_id, Some(&format!("candidate{}@example.com", application_id)))
            .await;
        let issued = self
            .state
            .magic_links
            .issue(application_id, &RequestContext::default())
            .await
            .unwrap();
        (issued.token, issued.record)
    }

    /// Store a link record for a known raw token
    pub async fn insert_link(&self, token: &str, record: impl FnOnce(&mut MagicLinkToken)) -> MagicLinkToken {
        let hash = TokenHasher::new(MAGIC_LINK_SECRET).hash(token).unwrap();
        let mut link = MagicLinkToken::new(1, hash, ap_shared::config::SCOPE_UPLOAD_DOCUMENTS, 72);
        record(&mut link);
        self.magic_link_repo.insert(link.clone()).await;
        link
    }
}

/// One part of a multipart body
pub struct Part<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub data: &'a [u8],
}

impl<'a> Part<'a> {
    pub fn file(file_name: &'a str, content_type: &'a str, data: &'a [u8]) -> Self {
        Self {
            name: "files",
            file_name: Some(file_name),
            content_type: Some(content_type),
            data,
        }
    }

    pub fn text(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            file_name: None,
            content_type: None,
            data: value.as_bytes(),
        }
    }
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part.file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    part.name, file_name
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name).as_bytes(),
            ),
        }
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}
