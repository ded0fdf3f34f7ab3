//! Integration test: server endpoints

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use ride_demand::inference::Predictor;
use ride_demand::server::{create_router, AppState};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> (tempfile::TempDir, Arc<AppState>, axum::Router) {
    let dir = tempfile::tempdir().unwrap();
    common::train_into(dir.path());
    let state = Arc::new(AppState::new(Predictor::load(dir.path()).unwrap()));
    let app = create_router(state.clone());
    (dir, state, app)
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 64).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn form_request(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_index_renders_form() {
    let (_dir, _state, app) = test_app();
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"action="/predict""#));
    assert!(!html.contains("Predicted Ride Demand"));
}

#[tokio::test]
async fn test_predict_renders_value() {
    let (_dir, _state, app) = test_app();
    let response = app
        .oneshot(form_request(
            "year=2025&month=6&day_of_week=4&hour=18&temperature=27&humidity=60&wind_speed=5&weather_condition=1",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Predicted Ride Demand: "), "{}", html);
    assert!(html.contains(" rides/hour"));
}

#[tokio::test]
async fn test_predict_with_partial_form() {
    let (_dir, _state, app) = test_app();
    let response = app.oneshot(form_request("hour=abc")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Predicted Ride Demand: "));
}

#[tokio::test]
async fn test_predict_error_is_rendered() {
    let (_dir, _state, app) = test_app();
    let response = app.oneshot(form_request("humidity=inf")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Error: "));
}

#[tokio::test]
async fn test_predict_without_form_content_type() {
    let (_dir, _state, app) = test_app();
    let no_type = Request::builder()
        .method("POST")
        .uri("/predict")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(no_type).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"action="/predict""#));
    assert!(html.contains("Predicted Ride Demand: "), "{}", html);

    let json_body = Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"hour": 3}"#))
        .unwrap();
    let response = app.oneshot(json_body).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Predicted Ride Demand: "));
}

#[tokio::test]
async fn test_repeated_field_uses_first_value() {
    let (_dir, state, app) = test_app();
    let response = app.oneshot(form_request("hour=5&hour=22")).await.unwrap();
    let html = body_text(response).await;

    let expected = state.predictor.predict(&ride_demand::features::FeatureVector {
        hour: 5.0,
        ..Default::default()
    });
    assert!(html.contains(&ride_demand::inference::render_outcome(&expected)), "{}", html);
}

#[tokio::test]
async fn test_health_reports_run_id() {
    let (_dir, state, app) = test_app();
    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["run_id"], state.predictor.run_id().to_string());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (_dir, _state, app) = test_app();
    let response = app
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
