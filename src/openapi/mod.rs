use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SmartFlow API",
        version = "0.1.0",
        description = r#"
# SmartFlow Prediction API

Prediction endpoints for inventory operations.

## Features

- **Sales Forecasting**: Weekly sales forecasts from an additive trend/seasonality model
- **Stockout Alerts**: Binary stockout classification from a pre-trained tree ensemble
- **Route Optimization**: Delivery coordinate clustering with a deterministic seed

## Error Handling

The API uses a consistent error response format with appropriate HTTP status codes:

```json
{
  "error": "Bad Request",
  "message": "forecast requires a non-empty sales history",
  "request_id": "req-abc123xyz",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "inventory", description = "Forecast and stockout prediction endpoints"),
        (name = "routes", description = "Delivery route clustering endpoints")
    ),
    paths(
        crate::handlers::forecast::forecast_sales,
        crate::handlers::stockout::stockout_alert,
        crate::handlers::optimize::optimize_routes,
    ),
    components(schemas(
        crate::handlers::forecast::ForecastRequest,
        crate::handlers::forecast::ForecastResponse,
        crate::handlers::stockout::StockoutRequest,
        crate::handlers::stockout::StockoutResponse,
        crate::handlers::optimize::OptimizeRequest,
        crate::ml::forecasting::SalesRecord,
        crate::ml::forecasting::ForecastPoint,
        crate::ml::clustering::GeoPoint,
        crate::ml::clustering::RouteOptimization,
        crate::errors::ErrorResponse,
    ))
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
