//! CORS configuration for the portal frontend and internal tools.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use ap_shared::CorsConfig;
use tracing::info;

/// Build the CORS middleware from configuration
///
/// `*` in the origin list allows any origin; otherwise only the listed
/// origins are accepted. Credentials are never allowed since the API is
/// authorized by URL tokens and bearer keys, not cookies.
pub fn create_cors(config: &CorsConfig) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .expose_headers(vec![header::RETRY_AFTER])
        .max_age(config.max_age);

    if config.allows_any_origin() {
        info!("CORS allows any origin");
        return cors.allow_any_origin();
    }

    info!(origins = ?config.allowed_origins, "CORS restricted to configured origins");
    config
        .allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    #[actix_web::test]
    async fn test_configured_origin_allowed() {
        let config = CorsConfig {
            allowed_origins: vec!["https://jobs.example.com".to_string()],
            max_age: 600,
        };
        let app = test::init_service(
            App::new()
                .wrap(create_cors(&config))
                .route("/health", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/health")
            .insert_header((header::ORIGIN, "https://jobs.example.com"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(
            res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://jobs.example.com"
        );
    }

    #[actix_web::test]
    async fn test_unknown_origin_gets_no_allow_header() {
        let config = CorsConfig {
            allowed_origins: vec!["https://jobs.example.com".to_string()],
            max_age: 600,
        };
        let app = test::init_service(
            App::new()
                .wrap(create_cors(&config))
                .route("/health", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/health")
            .insert_header((header::ORIGIN, "https://evil.example.org"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert!(res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
