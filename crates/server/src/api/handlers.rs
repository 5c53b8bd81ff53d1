use axum::Json;
use serde::Serialize;

use crate::metrics::encode_metrics;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "pressa".to_string(),
        version: VERSION.to_string(),
    })
}

pub async fn metrics() -> String {
    encode_metrics()
}
