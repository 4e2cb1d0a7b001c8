mod common;

use serde_json::json;

use common::{response_json, TestApp};

fn two_depot_coords() -> serde_json::Value {
    json!([[10.0, 20.0], [10.1, 20.1], [50.0, 60.0], [50.1, 60.1]])
}

#[tokio::test]
async fn nearby_points_cluster_together() {
    let app = TestApp::new();

    let response = app
        .post_json("/api/routes/optimize", json!({"coords": two_depot_coords()}))
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    let clusters = body["clusters"].as_object().expect("cluster map");
    assert_eq!(clusters.len(), 2);

    // Each cluster holds exactly the two nearby points.
    for points in clusters.values() {
        let points = points.as_array().expect("cluster points");
        assert_eq!(points.len(), 2);
        let lat0 = points[0]["lat"].as_f64().unwrap();
        let lat1 = points[1]["lat"].as_f64().unwrap();
        assert!((lat0 - lat1).abs() < 1.0);
    }
}

#[tokio::test]
async fn path_is_the_input_in_original_order() {
    let app = TestApp::new();

    let response = app
        .post_json("/api/routes/optimize", json!({"coords": two_depot_coords()}))
        .await;
    let body = response_json(response).await;

    assert_eq!(body["optimized_path"], two_depot_coords());
}

#[tokio::test]
async fn fuel_saved_uses_the_documented_placeholder_formula() {
    let app = TestApp::new();

    let response = app
        .post_json("/api/routes/optimize", json!({"coords": two_depot_coords()}))
        .await;
    let body = response_json(response).await;

    // 0.5 × (4 points − 2 clusters)
    assert_eq!(body["fuel_saved"], 1.0);
}

#[tokio::test]
async fn repeated_identical_input_is_deterministic() {
    let app = TestApp::new();
    let payload = json!({"coords": two_depot_coords()});

    let first = response_json(app.post_json("/api/routes/optimize", payload.clone()).await).await;
    for _ in 0..3 {
        let again =
            response_json(app.post_json("/api/routes/optimize", payload.clone()).await).await;
        assert_eq!(again, first);
    }
}

#[tokio::test]
async fn fewer_points_than_clusters_returns_400() {
    let app = TestApp::new();

    let response = app
        .post_json("/api/routes/optimize", json!({"coords": [[10.0, 20.0]]}))
        .await;
    assert_eq!(response.status(), 400);

    let body = response_json(response).await;
    assert!(body["message"]
        .as_str()
        .expect("message")
        .contains("at least 2"));
}

#[tokio::test]
async fn coordinates_alias_is_accepted() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/api/routes/optimize",
            json!({"coordinates": two_depot_coords()}),
        )
        .await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn cluster_map_conserves_every_input_point() {
    let app = TestApp::new();

    let response = app
        .post_json("/api/routes/optimize", json!({"coords": two_depot_coords()}))
        .await;
    let body = response_json(response).await;

    let total: usize = body["clusters"]
        .as_object()
        .expect("cluster map")
        .values()
        .map(|points| points.as_array().expect("points").len())
        .sum();
    assert_eq!(total, 4);
}
