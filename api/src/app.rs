//! Application factory
//!
//! Builds the actix-web `App` from a prepared [`AppState`]. The binary and
//! the integration tests share this factory.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    error::InternalError,
    web, App, HttpResponse,
};
use ap_shared::{error_codes, ErrorResponse};
use tracing_actix_web::TracingLogger;

use crate::middleware::{create_cors, SecurityHeaders};
use crate::routes;
use crate::state::AppState;

/// Largest accepted JSON body
const JSON_LIMIT_BYTES: usize = 16 * 1024;

/// Create and configure the application
pub fn create_app(
    app_state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let cors = create_cors(&app_state.http.cors);
    let security = SecurityHeaders::new(app_state.http.hsts);
    let internal_api_key = app_state.http.internal_api_key.clone();

    App::new()
        .app_data(app_state)
        .app_data(json_config())
        // Middleware order: the last wrap runs first
        .wrap(security)
        .wrap(cors)
        .wrap(TracingLogger::default())
        .configure(|cfg| routes::configure(cfg, &internal_api_key))
        .default_service(web::route().to(not_found))
}

/// JSON extractor answering malformed bodies with an error document
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(|err, _req| {
            let response =
                HttpResponse::BadRequest().json(ErrorResponse::new(error_codes::BAD_REQUEST, err.to_string()));
            InternalError::from_response(err, response).into()
        })
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
