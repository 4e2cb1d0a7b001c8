use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::ml::clustering::{self, RouteOptimization};

#[derive(Debug, Deserialize, ToSchema)]
pub struct OptimizeRequest {
    /// Delivery coordinates as (latitude, longitude) pairs.
    #[serde(alias = "coordinates")]
    #[schema(value_type = Vec<Vec<f64>>)]
    pub coords: Vec<[f64; 2]>,
}

/// Create the route-optimization router
pub fn optimize_router() -> Router<AppState> {
    Router::new().route("/optimize", post(optimize_routes))
}

/// Group delivery coordinates into clusters
#[utoipa::path(
    post,
    path = "/api/routes/optimize",
    request_body = OptimizeRequest,
    responses(
        (status = 200, description = "Cluster assignment returned", body = RouteOptimization),
        (status = 400, description = "Fewer coordinate pairs than clusters", body = crate::errors::ErrorResponse)
    ),
    tag = "routes"
)]
pub async fn optimize_routes(
    State(_state): State<AppState>,
    Json(req): Json<OptimizeRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let result = clustering::optimize_delivery(&req.coords)?;
    Ok((StatusCode::OK, Json(result)))
}
