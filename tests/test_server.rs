//! Integration test: prediction server endpoints over trained artifacts

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use common::{Workspace, FEATURES};
use datascience::server::{create_router, AppState};
use datascience::PipelineError;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn trained(scaler: &str, model_type: &str) -> Workspace {
    let ws = Workspace::new(scaler, model_type);
    ws.pipeline().run_train().unwrap();
    ws
}

fn test_app(ws: &Workspace) -> axum::Router {
    let state = Arc::new(AppState::load(ws.config()).unwrap());
    create_router(state)
}

async fn send(app: axum::Router, method: &str, uri: &str, body: Body) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn predict(app: axum::Router, payload: Value) -> (StatusCode, Value) {
    send(app, "POST", "/predict", Body::from(payload.to_string())).await
}

fn record(fa: f64, alc: f64, ph: f64) -> Value {
    json!({ "fixed acidity": fa, "alcohol": alc, "pH": ph })
}

#[tokio::test]
async fn test_health_endpoint() {
    let ws = trained("none", "linear");
    let (status, body) = send(test_app(&ws), "GET", "/health", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(
        body["model_dir"].as_str().unwrap(),
        ws.config().paths.model_dir.display().to_string()
    );
}

#[tokio::test]
async fn test_predict_one_record() {
    let ws = trained("standard", "linear");
    let (status, body) = predict(test_app(&ws), json!({ "data": record(7.0, 10.0, 3.2) })).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["n"], 1);
    let predictions = body["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 1);
    // quality = 0.5 * fa + 0.2 * alc - pH + 2
    assert!((predictions[0].as_f64().unwrap() - 4.3).abs() < 1e-6);
}

#[tokio::test]
async fn test_predict_batch_keeps_order() {
    let ws = trained("standard", "random_forest");
    let app = test_app(&ws);
    let rows = [record(6.3, 9.4, 3.1), record(8.4, 11.2, 3.45), record(7.2, 10.0, 3.3)];

    let (status, batch) = predict(app.clone(), json!({ "data": rows })).await;
    assert_eq!(status, StatusCode::OK, "{batch}");
    assert_eq!(batch["n"], 3);
    let batch = batch["predictions"].as_array().unwrap().clone();
    assert_eq!(batch.len(), 3);

    for (i, row) in rows.iter().enumerate() {
        let (_, single) = predict(app.clone(), json!({ "data": row })).await;
        assert_eq!(single["predictions"][0], batch[i]);
    }
}

#[tokio::test]
async fn test_key_order_does_not_matter() {
    let ws = trained("minmax", "linear");
    let app = test_app(&ws);
    let body = r#"{"data": {"pH": 3.2, "alcohol": 10.0, "fixed acidity": 7.0}}"#;
    let (_, shuffled) = send(app.clone(), "POST", "/predict", Body::from(body)).await;
    let (_, ordered) = predict(app, json!({ "data": record(7.0, 10.0, 3.2) })).await;
    assert_eq!(shuffled["predictions"], ordered["predictions"]);
}

#[tokio::test]
async fn test_numeric_strings_are_accepted() {
    let ws = trained("none", "linear");
    let payload = json!({ "data": { "fixed acidity": "7.0", "alcohol": "10", "pH": 3.2 } });
    let (status, body) = predict(test_app(&ws), payload).await;
    assert_eq!(status, StatusCode::OK, "{body}");
}

#[tokio::test]
async fn test_missing_and_unexpected_keys_rejected() {
    let ws = trained("none", "linear");
    let app = test_app(&ws);

    let (status, body) = predict(app.clone(), json!({ "data": { "alcohol": 10.0, "pH": 3.2 } })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("fixed acidity"));

    let mut extra = record(7.0, 10.0, 3.2);
    extra["color"] = json!(1);
    let (status, body) = predict(app.clone(), json!({ "data": extra })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("color"));

    let (status, body) = predict(app, json!({ "data": [record(7.0, 10.0, 3.2), { "alcohol": 1 }] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Record 1:"));
}

#[tokio::test]
async fn test_malformed_bodies_rejected() {
    let ws = trained("none", "linear");
    let app = test_app(&ws);

    let (status, body) = send(app.clone(), "POST", "/predict", Body::from("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    for payload in [json!({ "rows": [] }), json!({ "data": [] }), json!({ "data": 5 })] {
        let (status, _) = predict(app.clone(), payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let payload = json!({ "data": { "fixed acidity": "sour", "alcohol": 10.0, "pH": 3.2 } });
    let (status, body) = predict(app, payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("fixed acidity"));
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let ws = trained("none", "linear");
    let (status, body) = send(test_app(&ws), "GET", "/nope", Body::empty()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[test]
fn test_startup_fails_without_model() {
    let ws = Workspace::new("none", "linear");
    ws.pipeline().run_data().unwrap();
    let err = AppState::load(ws.config()).unwrap_err();
    assert!(matches!(err, PipelineError::MissingInput(_)));
}

#[test]
fn test_state_holds_training_feature_order() {
    let ws = trained("standard", "linear");
    let state = AppState::load(ws.config()).unwrap();
    assert_eq!(state.feature_names, FEATURES.to_vec());
    assert!(state.scaler.is_some());
}
