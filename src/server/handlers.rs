//! HTTP request handlers

use std::sync::Arc;
use axum::{body::Bytes, extract::State, Json};
use serde_json::{json, Value};
use tracing::debug;

use super::error::Result;
use super::state::AppState;

/// Liveness only; the model itself is not probed
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model_dir": state.config.paths.model_dir.display().to_string(),
    }))
}

/// Score one record or a batch of records
pub async fn predict(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<Value>> {
    let predictions = state.predict_body(&body)?;
    debug!(rows = predictions.len(), "Prediction served");

    Ok(Json(json!({
        "predictions": predictions.to_vec(),
        "n": predictions.len(),
    })))
}
