//! Tests for sending and resending upload links

use std::sync::Arc;

use chrono::{Duration, Utc};

use super::{audit, SCOPE, SECRET};
use crate::domain::entities::audit::AuditEventType;
use crate::domain::value_objects::RequestContext;
use crate::errors::{DomainError, TokenError, ValidationError};
use crate::repositories::{MockApplicationRepository, MockAuditLogRepository, MockMagicLinkRepository};
use crate::services::delivery::MockLinkDelivery;
use crate::services::token::{LinkDispatchService, MagicLinkService, MagicLinkServiceConfig, TokenHasher};

struct Fixture {
    dispatch: LinkDispatchService,
    magic_links: Arc<MagicLinkService>,
    links: Arc<MockMagicLinkRepository>,
    applications: Arc<MockApplicationRepository>,
    delivery: Arc<MockLinkDelivery>,
    audit_repo: Arc<MockAuditLogRepository>,
}

fn fixture(base_url: Option<&str>) -> Fixture {
    let links = Arc::new(MockMagicLinkRepository::new());
    let applications = Arc::new(MockApplicationRepository::new());
    let delivery = Arc::new(MockLinkDelivery::new());
    let (audit, audit_repo) = audit();
    let magic_links = Arc::new(MagicLinkService::new(
        links.clone(),
        TokenHasher::new(SECRET),
        audit.clone(),
        MagicLinkServiceConfig::default(),
    ));
    let dispatch = LinkDispatchService::new(
        magic_links.clone(),
        applications.clone(),
        delivery.clone(),
        audit,
        base_url.map(str::to_string),
    );
    Fixture {
        dispatch,
        magic_links,
        links,
        applications,
        delivery,
        audit_repo,
    }
}

#[tokio::test]
async fn test_send_to_candidate_email_on_file() {
    let f = fixture(Some("https://jobs.example.com/"));
    f.applications.seed(5, Some("erika@example.com")).await;

    let sent = f
        .dispatch
        .send_upload_link(5, None, &RequestContext::default())
        .await
        .unwrap();

    assert_eq!(sent.recipient, "erika@example.com");
    let messages = f.delivery.magic_links().await;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].url.starts_with("https://jobs.example.com/r/"));
    assert_eq!(messages[0].candidate_name.as_deref(), Some("Candidate 5"));
    assert_eq!(messages[0].reference, "BW-0005");

    // The delivered token is a working link
    let token = f.delivery.last_magic_link_token().await.unwrap();
    let record = f.magic_links.peek(&token, SCOPE, &RequestContext::default()).await.unwrap();
    assert_eq!(record.application_id, 5);
}

#[tokio::test]
async fn test_explicit_email_overrides_candidate() {
    let f = fixture(None);
    f.applications.seed(5, Some("erika@example.com")).await;

    let sent = f
        .dispatch
        .send_upload_link(5, Some("  hr-copy@example.com "), &RequestContext::default())
        .await
        .unwrap();

    assert_eq!(sent.recipient, "hr-copy@example.com");
    assert!(f.delivery.magic_links().await[0].url.starts_with("/r/"));
}

#[tokio::test]
async fn test_missing_email_is_rejected() {
    let f = fixture(None);
    f.applications.seed(5, None).await;

    let result = f.dispatch.send_upload_link(5, Some(" "), &RequestContext::default()).await;

    assert!(matches!(
        result,
        Err(DomainError::ValidationErr(ValidationError::RequiredField { .. }))
    ));
    assert_eq!(f.links.len().await, 0);
}

#[tokio::test]
async fn test_unknown_application() {
    let f = fixture(None);
    let result = f
        .dispatch
        .send_upload_link(99, Some("a@example.com"), &RequestContext::default())
        .await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_delivery_failure_surfaces() {
    let f = fixture(None);
    f.applications.seed(5, Some("erika@example.com")).await;
    f.delivery.set_should_fail(true);

    let result = f.dispatch.send_upload_link(5, None, &RequestContext::default()).await;
    assert!(matches!(result, Err(DomainError::Internal { .. })));
}

#[tokio::test]
async fn test_resend_from_expired_link() {
    let f = fixture(None);
    f.applications.seed(5, Some("erika@example.com")).await;
    let issued = f.magic_links.issue(5, &RequestContext::default()).await.unwrap();
    let mut stored = f.links.get(issued.record.id).await.unwrap();
    stored.expires_at = Utc::now() - Duration::hours(1);
    f.links.insert(stored).await;

    let sent = f.dispatch.resend(&issued.token, &RequestContext::default()).await.unwrap();

    assert_eq!(sent.recipient, "erika@example.com");
    let fresh = f.delivery.last_magic_link_token().await.unwrap();
    assert_ne!(fresh, issued.token);
    assert!(f.magic_links.peek(&fresh, SCOPE, &RequestContext::default()).await.is_ok());
    assert_eq!(f.links.tokens_for_application(5).await.len(), 2);
    assert_eq!(f.audit_repo.logs_of_type(AuditEventType::MagicLinkResent).len(), 1);
}

#[tokio::test]
async fn test_resend_rejects_revoked_and_unknown() {
    let f = fixture(None);
    f.applications.seed(5, Some("erika@example.com")).await;
    let issued = f.magic_links.issue(5, &RequestContext::default()).await.unwrap();
    f.magic_links
        .revoke(issued.record.id, &RequestContext::default())
        .await
        .unwrap();

    for token in [issued.token.as_str(), "unknown"] {
        let result = f.dispatch.resend(token, &RequestContext::default()).await;
        assert!(matches!(result, Err(DomainError::Token(TokenError::NotFound))));
    }
    assert!(f.delivery.magic_links().await.is_empty());
}

#[tokio::test]
async fn test_resend_without_candidate_email() {
    let f = fixture(None);
    f.applications.seed(5, None).await;
    let issued = f.magic_links.issue(5, &RequestContext::default()).await.unwrap();

    let result = f.dispatch.resend(&issued.token, &RequestContext::default()).await;
    assert!(matches!(result, Err(DomainError::Token(TokenError::NotFound))));
}
