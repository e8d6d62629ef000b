//! Route handlers
//!
//! - `health`: liveness and database check
//! - `magic_links`: internal issuance and revocation (bearer key)
//! - `portal`: candidate upload portal behind `/r/{token}`
//! - `password`: forgot and reset password

pub mod health;
pub mod magic_links;
pub mod password;
pub mod portal;

use actix_web::{web, HttpResponse};
use ap_core::domain::value_objects::RequestContext;
use ap_shared::RouteLimit;

use crate::handlers::handle_domain_error;
use crate::middleware::InternalAuth;
use crate::state::AppState;

/// Register every route
pub fn configure(cfg: &mut web::ServiceConfig, internal_api_key: &str) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api/magic-links")
                .wrap(InternalAuth::new(internal_api_key))
                .route("", web::post().to(magic_links::create_magic_link))
                .route(
                    "/applications/{application_id}/revoke",
                    web::post().to(magic_links::revoke_application_links),
                )
                .route("/{token_id}/revoke", web::post().to(magic_links::revoke_magic_link)),
        )
        .service(
            web::scope("/r/{token}")
                .route("", web::get().to(portal::portal_status))
                .route("/resend", web::post().to(portal::resend_link))
                .route("/upload", web::post().to(portal::upload_files))
                .route(
                    "/attachments/{attachment_id}",
                    web::delete().to(portal::delete_attachment),
                ),
        )
        .route("/forgot-password", web::post().to(password::forgot_password))
        .service(
            web::resource("/reset-password/{token}")
                .route(web::get().to(password::check_reset_link))
                .route(web::post().to(password::reset_password)),
        );
}

/// Count the request against a route budget
pub(crate) async fn rate_limit(
    state: &AppState,
    route: &str,
    limit: RouteLimit,
    ctx: &RequestContext,
) -> Result<(), HttpResponse> {
    state
        .rate_limits
        .check(route, limit, ctx)
        .await
        .map_err(handle_domain_error)
}
