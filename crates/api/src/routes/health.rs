//! Liveness endpoint.

use axum::Json;
use serde::Serialize;

/// Build version reported alongside the liveness status.
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize)]
pub struct Liveness {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// GET /health — answers as long as the process can serve requests.
/// The store is not consulted.
pub async fn check() -> Json<Liveness> {
    Json(Liveness {
        status: "ok",
        service: "orders",
        version: VERSION,
    })
}
