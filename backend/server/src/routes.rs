use std::sync::Arc;

use axum::{Json, extract, http::StatusCode, response::IntoResponse};
use tracing::{info, warn};

use crate::{database::Document, error::AppError, state::State};

pub async fn data_handler(
    extract::State(state): extract::State<Arc<State>>,
) -> Result<Json<Vec<Document>>, AppError> {
    let documents = state.store.fetch_all().await.map_err(|e| {
        warn!("Failed to read dataset: {e}");
        e
    })?;

    info!("Serving {} documents", documents.len());

    Ok(Json(documents))
}

pub async fn health_handler(extract::State(state): extract::State<Arc<State>>) -> impl IntoResponse {
    if state.store.is_healthy().await {
        (StatusCode::OK, "ok").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "document store unavailable").into_response()
    }
}
