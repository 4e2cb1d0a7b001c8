//! SmartFlow API Library
//!
//! Prediction endpoints for inventory operations: weekly sales forecasting,
//! stockout alerting from a pre-trained classifier, and delivery route
//! clustering. The HTTP layer is a thin adapter over the three independent
//! routines in [`ml`].
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod ml;
pub mod openapi;
pub mod tracing;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};

use crate::ml::stockout::StockoutModel;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    /// Read-only classifier handle, shared across requests.
    pub stockout: Arc<StockoutModel>,
}

impl AppState {
    /// State wired from configuration; the classifier is loaded lazily on
    /// first use.
    pub fn from_config(config: config::AppConfig) -> Self {
        let stockout = Arc::new(StockoutModel::new(&config.classifier_path));
        Self { config, stockout }
    }
}

/// The three prediction endpoint families, grouped by URL prefix.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest(
            "/api/inventory",
            handlers::forecast::forecast_router().merge(handlers::stockout::stockout_router()),
        )
        .nest("/api/routes", handlers::optimize::optimize_router())
}

/// Build the complete application router: liveness root, health endpoints,
/// prediction endpoints, Swagger UI, and the middleware stack.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::root_banner))
        .nest("/health", handlers::health::health_routes())
        .merge(api_routes())
        .merge(openapi::swagger_ui())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(tracing::configure_http_tracing())
        .layer(CompressionLayer::new())
        .layer(cors_layer(&state.config))
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}

/// CORS policy: explicit origins when configured, otherwise fully open —
/// all origins, methods, and headers are permitted.
fn cors_layer(config: &config::AppConfig) -> CorsLayer {
    let configured_origins: Option<Vec<axum::http::HeaderValue>> = config
        .cors_allowed_origins
        .as_ref()
        .map(|raw| {
            raw.split(',')
                .filter_map(|origin| {
                    let trimmed = origin.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        axum::http::HeaderValue::from_str(trimmed).ok()
                    }
                })
                .collect::<Vec<_>>()
        })
        .filter(|origins| !origins.is_empty());

    match configured_origins {
        Some(origins) => CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    }
}
