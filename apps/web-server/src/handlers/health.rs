//! Liveness check.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

/// Which backends this process ended up on after startup fallbacks.
#[derive(Serialize)]
struct HealthReport {
    status: &'static str,
    version: &'static str,
    storage: &'static str,
    cache: &'static str,
    timestamp: String,
}

/// GET /health/
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthReport {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        storage: state.storage.as_str(),
        cache: state.cache_backend,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
