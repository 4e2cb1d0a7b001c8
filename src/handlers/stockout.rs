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

/// Four economic/environmental features scored by the classifier. Short
/// aliases match the historical wire form of the payload.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StockoutRequest {
    #[serde(alias = "temp")]
    pub temperature: f64,
    #[serde(alias = "fuel")]
    pub fuel_price: f64,
    pub cpi: f64,
    #[serde(alias = "unemp")]
    pub unemployment_rate: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StockoutResponse {
    /// Fixed alert or all-clear message.
    pub alert: String,
}

/// Create the stockout router
pub fn stockout_router() -> Router<AppState> {
    Router::new().route("/stockout", post(stockout_alert))
}

/// Score a feature vector against the pre-trained stockout classifier
#[utoipa::path(
    post,
    path = "/api/inventory/stockout",
    request_body = StockoutRequest,
    responses(
        (status = 200, description = "Classifier verdict returned", body = StockoutResponse),
        (status = 500, description = "Classifier artifact missing or unreadable", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn stockout_alert(
    State(state): State<AppState>,
    Json(req): Json<StockoutRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let alert = state.stockout.check_stockout(
        req.temperature,
        req.fuel_price,
        req.cpi,
        req.unemployment_rate,
    )?;
    Ok((
        StatusCode::OK,
        Json(StockoutResponse {
            alert: alert.to_string(),
        }),
    ))
}
