//! Internal magic link endpoints, authorized by the internal API key.

use actix_web::{web, HttpRequest, HttpResponse};
use ap_core::errors::ValidationError;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::{CreateMagicLinkRequest, MagicLinkSentResponse, RevokeResponse};
use crate::handlers::{handle_domain_error, validation_failed};
use crate::middleware::request_context;
use crate::state::AppState;

/// Handler for POST /api/magic-links
///
/// Issues a fresh upload link for an application and sends it, by default
/// to the candidate's address on file.
///
/// # Request Body
///
/// ```json
/// { "application_id": 42, "email": "candidate@example.com" }
/// ```
///
/// # Response
///
/// ## Success (201 Created)
/// ```json
/// { "status": "sent", "application_id": 42, "expires_at": "2026-01-01T12:00:00Z" }
/// ```
///
/// ## Errors
/// - 400 Bad Request: `application_id_required`, `email_required`, `validation_error`
/// - 401 Unauthorized: missing or wrong API key
/// - 404 Not Found: unknown application
/// - 500 Internal Server Error: delivery failure
pub async fn create_magic_link(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<CreateMagicLinkRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_failed(errors);
    }

    let Some(application_id) = request.application_id else {
        return handle_domain_error(
            ValidationError::RequiredField {
                field: "application_id".to_string(),
            }
            .into(),
        );
    };

    let ctx = request_context(&req, &state.http.trusted_proxies);
    match state
        .dispatch
        .send_upload_link(application_id, request.email.as_deref(), &ctx)
        .await
    {
        Ok(link) => HttpResponse::Created().json(MagicLinkSentResponse::new(link.application_id, link.expires_at)),
        Err(e) => handle_domain_error(e),
    }
}

/// Handler for POST /api/magic-links/applications/{application_id}/revoke
pub async fn revoke_application_links(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> HttpResponse {
    let application_id = path.into_inner();
    let ctx = request_context(&req, &state.http.trusted_proxies);

    match state.magic_links.revoke_for_application(application_id, &ctx).await {
        Ok(revoked) => HttpResponse::Ok().json(RevokeResponse::new(revoked)),
        Err(e) => handle_domain_error(e),
    }
}

/// Handler for POST /api/magic-links/{token_id}/revoke
pub async fn revoke_magic_link(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> HttpResponse {
    let token_id = path.into_inner();
    let ctx = request_context(&req, &state.http.trusted_proxies);

    match state.magic_links.revoke(token_id, &ctx).await {
        Ok(revoked) => {
            info!(%token_id, revoked, "Revoke requested");
            HttpResponse::Ok().json(RevokeResponse::new(usize::from(revoked)))
        }
        Err(e) => handle_domain_error(e),
    }
}
