use std::collections::HashMap;
use std::time::Instant;

use actix_web::{web, HttpResponse};
use ap_shared::types::response::ServiceHealth;
use ap_shared::{HealthResponse, HealthStatus};

use crate::state::AppState;

/// Handler for GET /health
///
/// Reports the database and whether an upload backend is configured. Only
/// an unhealthy database turns the response into a 503.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let mut services = HashMap::new();

    if let Some(database) = &state.database {
        let started = Instant::now();
        let mut health = match database.health_check().await {
            Ok(true) => ServiceHealth {
                message: Some(database.statistics().to_string()),
                ..ServiceHealth::healthy()
            },
            Ok(false) => ServiceHealth::unhealthy("database did not answer"),
            Err(e) => ServiceHealth::unhealthy(e.to_string()),
        };
        health.response_time_ms = Some(started.elapsed().as_millis() as u64);
        services.insert("database".to_string(), health);
    }

    let storage = match state.uploads.ensure_storage() {
        Ok(backend) => ServiceHealth {
            status: HealthStatus::Healthy,
            message: Some(backend.backend_name().to_string()),
            response_time_ms: None,
        },
        Err(_) => ServiceHealth {
            status: HealthStatus::Degraded,
            message: Some("uploads disabled, no storage configured".to_string()),
            response_time_ms: None,
        },
    };
    services.insert("storage".to_string(), storage);

    let response = HealthResponse::from_services(services);
    match response.status {
        HealthStatus::Unhealthy => HttpResponse::ServiceUnavailable().json(response),
        _ => HttpResponse::Ok().json(response),
    }
}
