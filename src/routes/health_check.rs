use actix_web::HttpResponse;
use chrono::{DateTime, Utc};

/// Health check body
#[derive(serde::Serialize)]
struct HealthStatus {
    status: &'static str,
    timestamp: DateTime<Utc>,
}

/// Health check handler
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok",
        timestamp: Utc::now(),
    })
}
