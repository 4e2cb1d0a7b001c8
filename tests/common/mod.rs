#![allow(dead_code)]

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use smartflow_api as api;

/// Test harness around the real application router.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    /// App backed by the committed classifier artifact (cargo runs tests
    /// from the crate root, so the default relative path resolves).
    pub fn new() -> Self {
        Self::with_config(api::config::AppConfig::default())
    }

    /// App whose classifier artifact lives at `path`.
    pub fn with_classifier_path(path: &str) -> Self {
        Self::with_config(api::config::AppConfig {
            classifier_path: path.to_string(),
            ..api::config::AppConfig::default()
        })
    }

    pub fn with_config(config: api::config::AppConfig) -> Self {
        Self {
            router: api::app(api::AppState::from_config(config)),
        }
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response")
    }

    pub async fn post_json(&self, uri: &str, payload: Value) -> Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("response")
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
