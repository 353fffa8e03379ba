//! Liveness endpoint.

use actix_web::HttpResponse;
use serde::Serialize;

#[derive(Serialize)]
struct Health {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

/// GET /api/health - liveness probe. Touches no store, so it answers even
/// when the server fell back to the in-memory mode.
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(Health {
        status: "ok",
        service: "blogicum",
        version: env!("CARGO_PKG_VERSION"),
    })
}
