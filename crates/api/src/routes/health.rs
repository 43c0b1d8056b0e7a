use axum::{Json, Router, routing::get};
use mediqueue_core::mode::ClientMode;
use serde::Serialize;
use std::sync::Arc;

use crate::{ApiState, middleware::mode::RequestMode};

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    mode: ClientMode,
}

#[derive(Serialize)]
struct VersionResponse {
    service: &'static str,
    version: &'static str,
}

async fn health_check(RequestMode(mode): RequestMode) -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok", mode })
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        service: "mediqueue",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/version", get(version))
}
