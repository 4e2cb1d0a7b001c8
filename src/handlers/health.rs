use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;

use crate::handlers::AppState;

/// Component health status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Up,
    Down,
}

/// Individual component health details
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    pub message: String,
}

/// Full health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: ComponentStatus,
    pub version: String,
    pub timestamp: String,
    pub details: HealthDetails,
    pub response_time_ms: u128,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthDetails {
    pub classifier: ComponentHealth,
}

/// Static liveness payload served at the API root.
pub async fn root_banner() -> impl IntoResponse {
    Json(json!({ "message": "🚀 SmartFlow API is running!" }))
}

/// Basic liveness probe - just checks if the service is running
async fn liveness_check() -> impl IntoResponse {
    Json(json!({
        "status": "up",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Health check covering the one stateful dependency: the classifier
/// artifact. The forecast and clustering routines have no dependencies, so
/// an unreadable artifact degrades only the stockout endpoint and the
/// service still reports 200.
async fn detailed_health_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();

    let classifier = if state.stockout.is_loaded() {
        ComponentHealth {
            status: ComponentStatus::Up,
            message: "Classifier loaded".to_string(),
        }
    } else {
        match std::fs::metadata(state.stockout.artifact_path()) {
            Ok(_) => ComponentHealth {
                status: ComponentStatus::Up,
                message: "Artifact present, not yet loaded".to_string(),
            },
            Err(e) => ComponentHealth {
                status: ComponentStatus::Down,
                message: format!("Artifact unavailable: {}", e),
            },
        }
    };

    let response = HealthResponse {
        status: classifier.status.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        details: HealthDetails { classifier },
        response_time_ms: start.elapsed().as_millis(),
    };

    (StatusCode::OK, Json(response))
}

/// Creates the router for health check endpoints
///
/// Endpoints:
/// - GET /health          - Basic liveness probe
/// - GET /health/detailed - Component health including the classifier artifact
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(liveness_check))
        .route("/detailed", get(detailed_health_check))
}
