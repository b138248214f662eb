//! リレーエンドポイントのテスト
//!
//! ルーターを直接呼び出し、ステータスとJSON本体を検証

mod support;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use car_view::server::{build_router, AppState};
use car_view::validator::GatewayValidator;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use support::{status_error, ScriptedModel, FORD_ANALYSIS, GOOD_QUALITY, SAMPLE_IMAGE};
use tower::ServiceExt;

fn app_with(model: Arc<ScriptedModel>) -> axum::Router {
    let validator = GatewayValidator::new(model);
    build_router(AppState::new(Arc::new(validator)))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_front_photo_returns_match() {
    let model = Arc::new(ScriptedModel::replying("front", GOOD_QUALITY, FORD_ANALYSIS));
    let app = app_with(model.clone());

    let response = app
        .oneshot(post_json(
            "/classify-car-view",
            json!({"imageBase64": SAMPLE_IMAGE, "expectedView": "Front"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["detectedView"], "front");
    assert_eq!(body["expectedView"], "front");
    assert_eq!(body["isMatch"], true);
    assert_eq!(body["confidence"], 0.95);
    assert_eq!(body["quality"]["sharpness"], "High");
    assert_eq!(body["analysis"]["make"], "Ford");
    assert_eq!(model.call_count(), 3);
}

#[tokio::test]
async fn test_mismatch_returns_lower_confidence() {
    let model = Arc::new(ScriptedModel::replying("back", GOOD_QUALITY, FORD_ANALYSIS));

    let response = app_with(model)
        .oneshot(post_json(
            "/functions/v1/classify-car-view",
            json!({"imageBase64": SAMPLE_IMAGE, "expectedView": "front"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["detectedView"], "back");
    assert_eq!(body["isMatch"], false);
    assert_eq!(body["confidence"], 0.85);
}

#[tokio::test]
async fn test_missing_image_is_400_without_upstream_calls() {
    let model = Arc::new(ScriptedModel::replying("front", GOOD_QUALITY, FORD_ANALYSIS));

    let response = app_with(model.clone())
        .oneshot(post_json("/classify-car-view", json!({"expectedView": "front"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Missing imageBase64 or expectedView");
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn test_missing_expected_view_is_400() {
    let model = Arc::new(ScriptedModel::replying("front", GOOD_QUALITY, FORD_ANALYSIS));

    let response = app_with(model.clone())
        .oneshot(post_json(
            "/classify-car-view",
            json!({"imageBase64": SAMPLE_IMAGE, "expectedView": ""}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn test_invalid_json_body_is_400() {
    let model = Arc::new(ScriptedModel::default());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/classify-car-view")
        .body(Body::from("not json"))
        .unwrap();

    let response = app_with(model.clone()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn test_unknown_expected_view_is_400() {
    let model = Arc::new(ScriptedModel::default());

    let response = app_with(model.clone())
        .oneshot(post_json(
            "/classify-car-view",
            json!({"imageBase64": SAMPLE_IMAGE, "expectedView": "underside"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid expectedView: underside"));
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn test_bad_quality_json_still_succeeds() {
    let model = Arc::new(ScriptedModel::replying("front", "sorry, I can't", FORD_ANALYSIS));

    let response = app_with(model)
        .oneshot(post_json(
            "/classify-car-view",
            json!({"imageBase64": SAMPLE_IMAGE, "expectedView": "front"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(
        body["quality"],
        json!({
            "qualityScore": 50,
            "isBlurry": true,
            "sharpness": "Low",
            "issues": "Could not analyze quality"
        })
    );
}

#[tokio::test]
async fn test_stage_failure_is_500_with_stage_message() {
    let model = Arc::new(ScriptedModel::new(vec![Ok("front".into()), Err(status_error(503))]));

    let response = app_with(model)
        .oneshot(post_json(
            "/classify-car-view",
            json!({"imageBase64": SAMPLE_IMAGE, "expectedView": "front"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body, json!({"error": "Image quality analysis failed"}));
}

#[tokio::test]
async fn test_cors_preflight_is_open() {
    let model = Arc::new(ScriptedModel::default());
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/classify-car-view")
        .header(header::ORIGIN, "https://inspection.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type,apikey")
        .body(Body::empty())
        .unwrap();

    let response = app_with(model).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_health() {
    let model = Arc::new(ScriptedModel::default());
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let response = app_with(model).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "ok");
}
