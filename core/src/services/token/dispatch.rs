//! Sending upload links to candidates, on request and on resend.

use std::sync::Arc;

use ap_shared::url::join_public_url;
use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::domain::entities::application::{Application, Candidate};
use crate::domain::value_objects::RequestContext;
use crate::errors::{DomainError, DomainResult, TokenError, ValidationError};
use crate::repositories::ApplicationRepository;
use crate::services::audit::AuditService;
use crate::services::delivery::{LinkDeliveryTrait, MagicLinkMessage};

use super::service::{IssuedMagicLink, MagicLinkService};

/// Result of a successful dispatch
#[derive(Debug, Clone)]
pub struct DispatchedLink {
    pub application_id: i64,
    pub recipient: String,
    pub expires_at: DateTime<Utc>,
    /// Provider message id
    pub message_id: String,
}

pub struct LinkDispatchService {
    magic_links: Arc<MagicLinkService>,
    applications: Arc<dyn ApplicationRepository>,
    delivery: Arc<dyn LinkDeliveryTrait>,
    audit: Arc<AuditService>,
    public_base_url: Option<String>,
}

impl LinkDispatchService {
    pub fn new(
        magic_links: Arc<MagicLinkService>,
        applications: Arc<dyn ApplicationRepository>,
        delivery: Arc<dyn LinkDeliveryTrait>,
        audit: Arc<AuditService>,
        public_base_url: Option<String>,
    ) -> Self {
        Self {
            magic_links,
            applications,
            delivery,
            audit,
            public_base_url,
        }
    }

    /// Issue a link for an application and send it
    ///
    /// Without an explicit address the candidate's e-mail on file is used.
    pub async fn send_upload_link(
        &self,
        application_id: i64,
        email: Option<&str>,
        ctx: &RequestContext,
    ) -> DomainResult<DispatchedLink> {
        let application = self
            .applications
            .find_application(application_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: "application".to_string(),
            })?;
        let candidate = self.applications.find_candidate(application.candidate_id).await?;

        let explicit = email.map(str::trim).filter(|e| !e.is_empty());
        let recipient = explicit
            .or_else(|| candidate.as_ref().and_then(Candidate::contact_email))
            .map(str::to_string)
            .ok_or_else(|| ValidationError::RequiredField {
                field: "email".to_string(),
            })?;

        let issued = self.magic_links.issue(application.id, ctx).await?;
        self.deliver(&application, candidate.as_ref(), recipient, &issued).await
    }

    /// Trade a presented link, even an expired one, for a fresh link sent to
    /// the candidate's address on file
    pub async fn resend(&self, token: &str, ctx: &RequestContext) -> DomainResult<DispatchedLink> {
        let scope = self.magic_links.config().scope.clone();
        let previous = self.magic_links.find_for_resend(token, &scope).await?;

        let application = self
            .applications
            .find_application(previous.application_id)
            .await?
            .ok_or(TokenError::NotFound)?;
        let candidate = self
            .applications
            .find_candidate(application.candidate_id)
            .await?
            .ok_or(TokenError::NotFound)?;
        let recipient = candidate
            .contact_email()
            .map(str::to_string)
            .ok_or(TokenError::NotFound)?;

        let issued = self.magic_links.issue(application.id, ctx).await?;
        let dispatched = self.deliver(&application, Some(&candidate), recipient, &issued).await?;
        self.audit.log_magic_link_resent(&previous, &issued.record, ctx).await;

        Ok(dispatched)
    }

    async fn deliver(
        &self,
        application: &Application,
        candidate: Option<&Candidate>,
        recipient: String,
        issued: &IssuedMagicLink,
    ) -> DomainResult<DispatchedLink> {
        let message = MagicLinkMessage {
            recipient: recipient.clone(),
            candidate_name: candidate.map(|c| c.name.clone()),
            job_title: application.job_title.clone(),
            reference: application.display_reference(),
            url: join_public_url(self.public_base_url.as_deref(), &issued.path()),
            expires_at: issued.record.expires_at,
        };

        let message_id = self.delivery.deliver_magic_link(&message).await.map_err(|e| {
            error!(application_id = application.id, error = %e, "Magic link delivery failed");
            DomainError::Internal {
                message: format!("Link delivery failed: {}", e),
            }
        })?;

        info!(application_id = application.id, %message_id, "Magic link sent");

        Ok(DispatchedLink {
            application_id: application.id,
            recipient,
            expires_at: issued.record.expires_at,
            message_id,
        })
    }
}
