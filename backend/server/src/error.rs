use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Document store error: {0}")]
    DocumentStore(#[from] meilisearch_sdk::errors::Error),

    #[error("Invalid {key}: {reason}")]
    Config { key: String, reason: String },

    #[error("Internal error: {0}")]
    InternalError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::DocumentStore { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
