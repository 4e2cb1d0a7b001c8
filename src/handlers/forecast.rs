use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::ml::forecasting::{self, ForecastPoint, SalesRecord};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ForecastRequest {
    /// Historical sales series; re-sorted by date before fitting.
    pub data: Vec<SalesRecord>,
    /// Number of future weekly periods to predict (must be >= 1).
    #[serde(alias = "horizon")]
    pub days: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ForecastResponse {
    pub forecast: Vec<ForecastPoint>,
}

/// Create the forecast router
pub fn forecast_router() -> Router<AppState> {
    Router::new().route("/forecast", post(forecast_sales))
}

/// Forecast future weekly sales from a dated series
#[utoipa::path(
    post,
    path = "/api/inventory/forecast",
    request_body = ForecastRequest,
    responses(
        (status = 200, description = "Forecast returned", body = ForecastResponse),
        (status = 400, description = "Empty series or invalid horizon", body = crate::errors::ErrorResponse),
        (status = 500, description = "Model could not be fit", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn forecast_sales(
    State(_state): State<AppState>,
    Json(req): Json<ForecastRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let forecast = forecasting::forecast_sales(&req.data, req.days)?;
    Ok((StatusCode::OK, Json(ForecastResponse { forecast })))
}
