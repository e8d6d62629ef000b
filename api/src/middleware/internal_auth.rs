//! Bearer key authentication for internal endpoints.
//!
//! Internal tools call the magic link endpoints with
//! `Authorization: Bearer <INTERNAL_API_KEY>`. Without a configured key the
//! endpoints refuse every request.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    http::header::AUTHORIZATION,
    Error, HttpResponse,
};
use ap_shared::{error_codes, ErrorResponse};
use constant_time_eq::constant_time_eq;
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use tracing::warn;

/// Internal key middleware factory
#[derive(Clone)]
pub struct InternalAuth {
    api_key: Arc<str>,
}

impl InternalAuth {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: Arc::from(api_key.trim()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for InternalAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = InternalAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(InternalAuthMiddleware {
            service: Rc::new(service),
            api_key: Arc::clone(&self.api_key),
        }))
    }
}

pub struct InternalAuthMiddleware<S> {
    service: Rc<S>,
    api_key: Arc<str>,
}

impl<S, B> Service<ServiceRequest> for InternalAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let authorized = is_authorized(&req, &self.api_key);

        Box::pin(async move {
            if !authorized {
                warn!(path = req.path(), "Rejected internal request without valid API key");
                return Err(unauthorized());
            }
            service.call(req).await
        })
    }
}

fn is_authorized(req: &ServiceRequest, api_key: &str) -> bool {
    if api_key.is_empty() {
        return false;
    }
    extract_bearer_token(req)
        .map(|presented| constant_time_eq(presented.as_bytes(), api_key.as_bytes()))
        .unwrap_or(false)
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

fn unauthorized() -> Error {
    let response = HttpResponse::Unauthorized().json(ErrorResponse::new(
        error_codes::UNAUTHORIZED,
        "Missing or invalid API key",
    ));
    InternalError::from_response("unauthorized", response).into()
}
