use axum::Json;
use serde::Serialize;

pub const LIVENESS_MESSAGE: &str = "KB server is running";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}
