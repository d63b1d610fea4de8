//! API route definitions

use std::sync::Arc;
use axum::{
    http::HeaderValue,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::{error::ServerError, handlers, state::AppState};

async fn handle_404() -> impl IntoResponse {
    ServerError::NotFound("Not found. Available routes: GET /health, POST /predict.".to_string())
}

async fn handle_405() -> impl IntoResponse {
    ServerError::MethodNotAllowed("Method not allowed.".to_string())
}

/// CORS origin from `CORS_ORIGIN`; any origin when unset
fn cors_layer() -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match std::env::var("CORS_ORIGIN") {
        Ok(origin) if !origin.is_empty() && origin != "*" => match origin.parse::<HeaderValue>() {
            Ok(value) => layer.allow_origin(value),
            Err(_) => layer.allow_origin(Any),
        },
        _ => layer.allow_origin(Any),
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/predict", post(handlers::predict))
        .fallback(handle_404)
        .method_not_allowed_fallback(handle_405)
        .with_state(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}
