//! Error types for the server

use crate::error::PipelineError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    MethodNotAllowed(String),

    /// Any failure on the prediction path; reported to the client verbatim
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::Pipeline(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
        };
        let message = self.to_string();
        if status == StatusCode::BAD_REQUEST {
            tracing::warn!(error = %message, "Request rejected");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_errors_are_bad_requests() {
        let err: ServerError = PipelineError::CoercionFailure("bad value".to_string()).into();
        assert_eq!(err.to_string(), "bad value");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_status() {
        let resp = ServerError::NotFound("nope".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_method_not_allowed_status() {
        let resp = ServerError::MethodNotAllowed("GET /predict".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
