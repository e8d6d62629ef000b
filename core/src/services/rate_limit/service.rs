//! Rate limit enforcement shared by the HTTP handlers.

use std::sync::Arc;

use ap_shared::RouteLimit;
use tracing::{debug, warn};

use crate::domain::value_objects::RequestContext;
use crate::errors::{DomainError, DomainResult};
use crate::services::audit::AuditService;

use super::traits::RateLimiterTrait;

pub struct RateLimitService {
    limiter: Arc<dyn RateLimiterTrait>,
    audit: Arc<AuditService>,
    enabled: bool,
}

impl RateLimitService {
    pub fn new(limiter: Arc<dyn RateLimiterTrait>, audit: Arc<AuditService>, enabled: bool) -> Self {
        Self {
            limiter,
            audit,
            enabled,
        }
    }

    /// Count a request of the client against the route budget
    ///
    /// Keys combine the route with the client IP. A limiter backend error
    /// lets the request through.
    pub async fn check(&self, route: &str, limit: RouteLimit, ctx: &RequestContext) -> DomainResult<()> {
        if !self.enabled {
            return Ok(());
        }

        let key = format!("{}:{}", route, ctx.ip_or_unknown());
        match self.limiter.hit(&key, limit).await {
            Ok(decision) if decision.allowed => {
                debug!(route, remaining = decision.remaining, "Rate limit check passed");
                Ok(())
            }
            Ok(decision) => {
                warn!(route, ip = ctx.ip_or_unknown(), "Rate limit exceeded");
                self.audit.log_rate_limit_exceeded(route, ctx).await;
                Err(DomainError::RateLimited {
                    retry_after_seconds: decision.retry_after_seconds,
                })
            }
            Err(e) => {
                warn!(route, error = %e, "Rate limiter unavailable, allowing request");
                Ok(())
            }
        }
    }
}
