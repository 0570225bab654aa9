//! Liveness and AI status handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct RootResponse {
    pub message: String,
}

/// GET /api - API banner
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: format!("Spendwise API v{}", env!("CARGO_PKG_VERSION")),
    })
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// `available`, `unavailable` or `not_configured`
    pub ai_service_status: &'static str,
    pub ai_backend: Option<String>,
    pub timestamp: String,
}

/// GET /api/health - Server health and AI backend reachability
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (ai_service_status, ai_backend) = match state.advisor.ai() {
        None => ("not_configured", None),
        Some(client) => {
            let status = if state.advisor.ai_available().await {
                "available"
            } else {
                "unavailable"
            };
            (status, Some(client.kind().to_string()))
        }
    };

    Json(HealthResponse {
        status: "healthy",
        ai_service_status,
        ai_backend,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
