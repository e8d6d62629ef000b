//! Candidate upload portal reached through a magic link.
//!
//! The status view reports token failures by category so an expired link
//! can offer a resend. Every route that changes something answers all token
//! failures with the same `invalid_or_expired` 404.

use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use ap_core::domain::entities::attachment::DocumentType;
use ap_core::errors::{DomainError, DomainResult, TokenError};
use ap_core::services::{UploadSession, UploadedFile};
use futures_util::TryStreamExt;
use tracing::{debug, warn};

use crate::dto::{
    DeleteAttachmentResponse, PortalErrorResponse, PortalStatusResponse, StatusResponse, UploadResponse,
};
use crate::handlers::error::token_error_status;
use crate::handlers::{handle_domain_error, handle_token_route_error, internal_error};
use crate::middleware::request_context;
use crate::state::AppState;

use super::rate_limit;

/// Form fields carrying files
const FILE_FIELDS: [&str; 3] = ["files", "files[]", "file"];

/// Limit for text fields and ignored parts
const MAX_TEXT_FIELD_BYTES: usize = 1024;

/// Handler for GET /r/{token}
///
/// Read-only: failed presentations are counted, but the link's last use is
/// not updated.
///
/// ## Errors
/// - 404 Not Found: unknown or revoked link (`can_resend: false`)
/// - 410 Gone: expired link (`can_resend: true`)
/// - 403 Forbidden: link locked after too many failed attempts
/// - 429 Too Many Requests
pub async fn portal_status(req: HttpRequest, state: web::Data<AppState>, token: web::Path<String>) -> HttpResponse {
    let ctx = request_context(&req, &state.http.trusted_proxies);
    if let Err(response) = rate_limit(&state, "status_page", state.http.route_limits.status_page, &ctx).await {
        return response;
    }

    let record = match state.magic_links.peek(&token, state.portal_scope(), &ctx).await {
        Ok(record) => record,
        Err(DomainError::Token(error)) => return portal_token_error(error),
        Err(e) => return handle_domain_error(e),
    };

    match state.uploads.status(&record).await {
        Ok(status) => HttpResponse::Ok().json(PortalStatusResponse::from(status)),
        Err(e) => handle_domain_error(e),
    }
}

fn portal_token_error(error: TokenError) -> HttpResponse {
    let (status, code) = token_error_status(&error);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        return internal_error();
    }

    let (message, can_resend) = match error {
        TokenError::Expired => ("This link has expired. You can request a new one.", true),
        TokenError::TooManyAttempts => ("This link has been locked for security reasons.", false),
        _ => ("This link is invalid.", false),
    };
    HttpResponse::build(status).json(PortalErrorResponse {
        error: code.to_string(),
        message: message.to_string(),
        can_resend,
    })
}

/// Handler for POST /r/{token}/resend
///
/// Trades a link, even an expired one, for a fresh link sent to the
/// candidate's address on file.
pub async fn resend_link(req: HttpRequest, state: web::Data<AppState>, token: web::Path<String>) -> HttpResponse {
    let ctx = request_context(&req, &state.http.trusted_proxies);
    if let Err(response) = rate_limit(&state, "resend", state.http.route_limits.resend, &ctx).await {
        return response;
    }

    match state.dispatch.resend(&token, &ctx).await {
        Ok(_) => HttpResponse::Created().json(StatusResponse::new("sent")),
        Err(e) => handle_token_route_error(e),
    }
}

/// Handler for POST /r/{token}/upload
///
/// Multipart form with one or more `files` parts and an optional
/// `document_type`. Parts are counted against the upload budget while they
/// stream in, so an oversized request is refused before it is buffered.
///
/// ## Success (201 Created)
/// ```json
/// {
///     "status": "uploaded",
///     "count": 1,
///     "uploaded_files": [{ "name": "cv.pdf" }],
///     "all_uploaded_files": [{ "id": 3, "name": "cv.pdf", "type": "application/pdf", ... }]
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: file type, size, count or application quota violations
/// - 404 Not Found: `invalid_or_expired`
/// - 413 Payload Too Large: request size exceeded
/// - 503 Service Unavailable: no storage configured or storage failure
pub async fn upload_files(
    req: HttpRequest,
    state: web::Data<AppState>,
    token: web::Path<String>,
    payload: Multipart,
) -> HttpResponse {
    let ctx = request_context(&req, &state.http.trusted_proxies);
    if let Err(response) = rate_limit(&state, "upload", state.http.route_limits.upload, &ctx).await {
        return response;
    }

    let record = match state.magic_links.peek(&token, state.portal_scope(), &ctx).await {
        Ok(record) => record,
        Err(e) => return handle_token_route_error(e),
    };
    let application_id = record.application_id;

    if let Err(e) = state.uploads.ensure_storage() {
        return handle_domain_error(e);
    }

    let session = match state.uploads.quota().open_session(application_id).await {
        Ok(session) => session,
        Err(e) => return handle_domain_error(e),
    };
    let files = match read_files(session, payload).await {
        Ok(files) => files,
        Err(e) => {
            state.uploads.record_rejection(application_id, &e, &ctx).await;
            return handle_domain_error(e);
        }
    };

    let stored = match state.uploads.store_files(application_id, files, &ctx).await {
        Ok(stored) => stored,
        Err(e) => return handle_domain_error(e),
    };

    if let Err(e) = state.magic_links.mark_used(record, &ctx).await {
        warn!(application_id, error = %e, "Could not record magic link use after upload");
    }

    match state.uploads.list_attachments(application_id).await {
        Ok(all) => HttpResponse::Created().json(UploadResponse::new(&stored, &all)),
        Err(e) => handle_domain_error(e),
    }
}

/// Stream the multipart body through the upload budget
async fn read_files(mut session: UploadSession, mut payload: Multipart) -> DomainResult<Vec<UploadedFile>> {
    let mut document_type: Option<String> = None;
    let mut received: Vec<(String, String, Vec<u8>)> = Vec::new();

    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == "document_type" {
            let value = read_text(&mut field).await?;
            document_type = Some(value);
            continue;
        }

        if !FILE_FIELDS.contains(&name.as_str()) {
            debug!(field = %name, "Ignoring unknown form field");
            read_text(&mut field).await?;
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or_default()
            .to_string();
        if file_name.trim().is_empty() {
            // Browsers send an empty part when no file was picked
            read_text(&mut field).await?;
            continue;
        }

        let mime_type = field
            .content_type()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let mut budget = session.begin_file(&mime_type)?;
        let mut data = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(malformed)? {
            session.consume(&mut budget, chunk.len() as u64)?;
            data.extend_from_slice(&chunk);
        }
        received.push((file_name, mime_type, data));
    }

    session.finish()?;

    let document_type = DocumentType::from_form(document_type.as_deref());
    Ok(received
        .into_iter()
        .map(|(file_name, mime_type, data)| UploadedFile {
            file_name,
            mime_type,
            document_type,
            data,
        })
        .collect())
}

async fn read_text(field: &mut Field) -> DomainResult<String> {
    let mut value = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        if value.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
            return Err(DomainError::Validation {
                message: "Form field too large".to_string(),
            });
        }
        value.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&value).trim().to_string())
}

fn malformed(error: MultipartError) -> DomainError {
    DomainError::Validation {
        message: format!("Malformed upload: {}", error),
    }
}

/// Handler for DELETE /r/{token}/attachments/{attachment_id}
///
/// Candidates may only delete their own uploads.
///
/// ## Errors
/// - 403 Forbidden: the attachment was not uploaded by the candidate
/// - 404 Not Found: `invalid_or_expired` link, or `not_found` attachment
pub async fn delete_attachment(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(String, i64)>,
) -> HttpResponse {
    let (token, attachment_id) = path.into_inner();
    let ctx = request_context(&req, &state.http.trusted_proxies);
    if let Err(response) =
        rate_limit(&state, "delete_attachment", state.http.route_limits.delete_attachment, &ctx).await
    {
        return response;
    }

    let record = match state.magic_links.peek(&token, state.portal_scope(), &ctx).await {
        Ok(record) => record,
        Err(e) => return handle_token_route_error(e),
    };
    let application_id = record.application_id;

    let remaining = match state
        .uploads
        .delete_attachment(application_id, attachment_id, &ctx)
        .await
    {
        Ok(remaining) => remaining,
        Err(e) => return handle_domain_error(e),
    };

    if let Err(e) = state.magic_links.mark_used(record, &ctx).await {
        warn!(application_id, error = %e, "Could not record magic link use after delete");
    }

    HttpResponse::Ok().json(DeleteAttachmentResponse::new(&remaining))
}
