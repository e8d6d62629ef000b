//! Forgot and reset password for internal users.

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::dto::{ForgotPasswordRequest, ResetLinkResponse, ResetPasswordRequest, StatusResponse};
use crate::handlers::{handle_domain_error, handle_token_route_error, validation_failed};
use crate::middleware::request_context;
use crate::state::AppState;

use super::rate_limit;

/// Handler for POST /forgot-password
///
/// Always answers `{"status": "sent"}`, whether or not the address belongs
/// to an account.
pub async fn forgot_password(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<ForgotPasswordRequest>,
) -> HttpResponse {
    let ctx = request_context(&req, &state.http.trusted_proxies);
    if let Err(response) = rate_limit(&state, "forgot_password", state.http.route_limits.forgot_password, &ctx).await {
        return response;
    }
    if let Err(errors) = request.validate() {
        return validation_failed(errors);
    }

    match state.password_resets.request_reset(&request.email, &ctx).await {
        Ok(()) => HttpResponse::Ok().json(StatusResponse::new("sent")),
        Err(e) => handle_domain_error(e),
    }
}

/// Handler for GET /reset-password/{token}
///
/// ## Errors
/// - 404 Not Found: unknown link
/// - 410 Gone: expired or already used link
pub async fn check_reset_link(
    req: HttpRequest,
    state: web::Data<AppState>,
    token: web::Path<String>,
) -> HttpResponse {
    let ctx = request_context(&req, &state.http.trusted_proxies);
    if let Err(response) = rate_limit(&state, "reset_password", state.http.route_limits.reset_password, &ctx).await {
        return response;
    }

    match state.password_resets.lookup(&token).await {
        Ok(record) => HttpResponse::Ok().json(ResetLinkResponse {
            status: "valid".to_string(),
            expires_at: record.expires_at,
        }),
        Err(e) => handle_domain_error(e),
    }
}

/// Handler for POST /reset-password/{token}
///
/// # Request Body
///
/// ```json
/// { "password": "N3w!password", "password_confirm": "N3w!password" }
/// ```
///
/// ## Errors
/// - 400 Bad Request: password policy or confirmation mismatch
/// - 404 Not Found: `invalid_or_expired`
pub async fn reset_password(
    req: HttpRequest,
    state: web::Data<AppState>,
    token: web::Path<String>,
    request: web::Json<ResetPasswordRequest>,
) -> HttpResponse {
    let ctx = request_context(&req, &state.http.trusted_proxies);
    if let Err(response) = rate_limit(&state, "reset_password", state.http.route_limits.reset_password, &ctx).await {
        return response;
    }
    if let Err(errors) = request.validate() {
        return validation_failed(errors);
    }

    match state
        .password_resets
        .reset_password(&token, &request.password, &request.password_confirm, &ctx)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(StatusResponse::new("reset")),
        Err(e) => handle_token_route_error(e),
    }
}
